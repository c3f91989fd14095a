//! MCP-backed tool host.

use std::path::Path;

use rmcp::model::CallToolResult;
use serde_json::Value;
use tracing::{debug, info};

use super::{HostCommands, HostKind, McpClient, ToolArguments, ToolError, ToolHost};
use crate::model::{ToolCall, ToolSpec};
use crate::{Error, Result};

/// Tool host backed by an MCP server script run as a child process.
pub struct McpToolHost {
    client: McpClient,
}

impl McpToolHost {
    /// Launch the host script and connect to it.
    ///
    /// The script suffix picks the interpreter. Unsupported suffixes fail
    /// before anything is spawned.
    pub async fn connect(path: impl AsRef<Path>, commands: &HostCommands) -> Result<Self> {
        let path = path.as_ref();
        let kind = HostKind::from_path(path).ok_or_else(|| Error::UnsupportedHostKind {
            path: path.to_path_buf(),
        })?;

        let script = path.to_string_lossy();
        let client = McpClient::spawn(commands.program(kind), [script.as_ref()]).await?;

        let tools = client.list_tools().await?;
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        info!(tools = %names.join(", "), "connected to tool host");

        Ok(Self { client })
    }
}

impl ToolHost for McpToolHost {
    async fn list_tools(&self) -> std::result::Result<Vec<ToolSpec>, ToolError> {
        let tools = self.client.list_tools().await?;
        Ok(tools.into_iter().map(ToolSpec::from).collect())
    }

    async fn call_tool(&self, call: &ToolCall) -> std::result::Result<Value, ToolError> {
        let arguments = ToolArguments::try_from(call.input.clone())?;
        debug!(tool = %call.name, id = %call.id, "calling tool");
        let result = self.client.call_tool(&call.name, arguments.0).await?;
        result_to_value(result)
    }

    async fn shutdown(self) -> std::result::Result<(), ToolError> {
        self.client.shutdown().await
    }
}

/// Turn a call result into the value fed back to the model.
///
/// Error payloads become [`ToolError::Execution`] carrying the text the
/// host reported.
fn result_to_value(result: CallToolResult) -> std::result::Result<Value, ToolError> {
    if result.is_error.unwrap_or(false) {
        let message = result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.as_str()))
            .collect::<Vec<_>>()
            .join("\n");
        return Err(ToolError::Execution(message));
    }

    serde_json::to_value(&result.content)
        .map_err(|e| ToolError::Execution(format!("serialize result: {e}")))
}
