//! MCP (Model Context Protocol) client over a child process.
//!
//! Thin wrapper around the rmcp SDK. The child process and its stdio
//! channel are owned by the running service: dropping the client cancels
//! the service, which closes the channel and kills the child.

use rmcp::{
    ServiceExt,
    model::{CallToolRequestParams, CallToolResult, JsonObject, Tool},
    service::{RoleClient, RunningService},
    transport::{ConfigureCommandExt, TokioChildProcess},
};
use tokio::process::Command;
use tracing::{debug, info};

use super::ToolError;

/// An MCP client connected to a server process.
pub struct McpClient {
    service: RunningService<RoleClient, ()>,
}

impl McpClient {
    /// Spawn an MCP server and perform the initialize handshake.
    ///
    /// # Arguments
    ///
    /// * `command` - The program to run (e.g., "python")
    /// * `args` - Arguments to pass to the program
    pub async fn spawn(
        command: impl AsRef<str>,
        args: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self, ToolError> {
        let command_str = command.as_ref().to_string();
        let args_vec: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        debug!(command = %command_str, args = ?args_vec, "spawning tool host");

        let transport = TokioChildProcess::new(Command::new(&command_str).configure(|cmd| {
            for arg in &args_vec {
                cmd.arg(arg);
            }
        }))
        .map_err(|e| ToolError::Transport(format!("failed to spawn {command_str}: {e}")))?;

        let service = ()
            .serve(transport)
            .await
            .map_err(|e| ToolError::Transport(format!("handshake failed: {e}")))?;

        if let Some(peer) = service.peer_info() {
            info!(
                server = %peer.server_info.name,
                version = %peer.server_info.version,
                "tool host initialized"
            );
        }

        Ok(Self { service })
    }

    /// List every tool offered by the server, following pagination.
    pub async fn list_tools(&self) -> Result<Vec<Tool>, ToolError> {
        self.service
            .list_all_tools()
            .await
            .map_err(|e| ToolError::Transport(format!("list tools: {e}")))
    }

    /// Call a tool with the given name and arguments.
    pub async fn call_tool(
        &self,
        name: impl Into<String>,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ToolError> {
        let params = CallToolRequestParams {
            name: name.into().into(),
            arguments,
            meta: None,
            task: None,
        };

        self.service
            .call_tool(params)
            .await
            .map_err(|e| ToolError::Transport(format!("call tool: {e}")))
    }

    /// Close the channel and wait for the service task to finish.
    pub async fn shutdown(self) -> Result<(), ToolError> {
        let reason = self
            .service
            .cancel()
            .await
            .map_err(|e| ToolError::Transport(format!("shutdown: {e}")))?;
        debug!(?reason, "tool host stopped");
        Ok(())
    }
}
