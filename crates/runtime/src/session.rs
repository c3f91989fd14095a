//! Session management.
//!
//! A [`Session`] owns the transcript, the model backend, and the tool host,
//! and mediates tool-use turns between them.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::model::{Backend, Message, ModelError, ModelRequest, Part, ToolCall, ToolResult};
use crate::tools::{ToolError, ToolHost};
use crate::{Error, Result};

/// Tunables for a session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of tool dispatch rounds per query.
    pub max_tool_rounds: usize,
    /// Input that ends the interactive loop, matched case-insensitively.
    pub exit_keyword: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: 8,
            exit_keyword: "quit".to_string(),
        }
    }
}

/// A conversation session with one model backend and one tool host.
pub struct Session<B, H> {
    backend: B,
    host: H,
    config: SessionConfig,
    messages: Vec<Message>,
}

impl<B: Backend, H: ToolHost> Session<B, H> {
    /// Create a session over a connected tool host.
    pub fn new(backend: B, host: H, config: SessionConfig) -> Self {
        Self {
            backend,
            host,
            config,
            messages: Vec::new(),
        }
    }

    /// The transcript so far. Entries are only ever appended.
    pub fn transcript(&self) -> &[Message] {
        &self.messages
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Send a user query and return the text to show the user.
    ///
    /// Text blocks and a marker for every tool call are collected in order
    /// and joined by newlines. Tool calls are executed and fed back to the
    /// model until it answers without requesting a tool.
    pub async fn run_query(&mut self, query: &str) -> Result<String> {
        self.messages.push(Message::user(query));

        let tools = self.host.list_tools().await?;
        debug!(tools = tools.len(), "fetched tool list");

        let mut output = Vec::new();
        let mut rounds = 0;

        loop {
            let response = self
                .backend
                .call(ModelRequest {
                    messages: &self.messages,
                    tools: &tools,
                })
                .await?;

            let message = response.message;
            // An entry with no content is rejected by the API on every later request.
            if message.parts.is_empty() {
                return Err(ModelError::EmptyResponse.into());
            }
            let calls = message.tool_calls();
            for part in &message.parts {
                match part {
                    Part::Text(text) => output.push(text.clone()),
                    Part::ToolCall(call) => output.push(call.marker()),
                    Part::ToolResult(_) => {}
                }
            }
            self.messages.push(message);

            if calls.is_empty() {
                return Ok(output.join("\n"));
            }

            if rounds == self.config.max_tool_rounds {
                let reason = ToolError::Execution(format!(
                    "not executed: tool round limit of {rounds} reached"
                ));
                let results = calls
                    .iter()
                    .map(|call| ToolResult::Failure {
                        tool_call_id: call.id.clone(),
                        error: reason.clone(),
                    })
                    .collect();
                self.messages.push(Message::tool_results(results));
                return Err(Error::RoundLimit(rounds));
            }

            let (results, failure) = self.dispatch(&calls).await;
            self.messages.push(Message::tool_results(results));
            if let Some(error) = failure {
                return Err(error.into());
            }
            rounds += 1;
        }
    }

    /// Execute tool calls in order, answering every one of them.
    ///
    /// After the first failure the remaining calls are not executed; they
    /// get a failure result so the transcript stays well-formed.
    async fn dispatch(&self, calls: &[ToolCall]) -> (Vec<ToolResult>, Option<ToolError>) {
        let mut results = Vec::with_capacity(calls.len());
        let mut failure = None;

        for call in calls {
            if failure.is_some() {
                results.push(ToolResult::Failure {
                    tool_call_id: call.id.clone(),
                    error: ToolError::Execution(
                        "not executed: an earlier tool call failed".to_string(),
                    ),
                });
                continue;
            }

            match self.host.call_tool(call).await {
                Ok(output) => results.push(success(call, output)),
                Err(error) => {
                    results.push(ToolResult::Failure {
                        tool_call_id: call.id.clone(),
                        error: error.clone(),
                    });
                    failure = Some(error);
                }
            }
        }

        (results, failure)
    }

    /// End the session, shutting down the tool host.
    pub async fn end(self) -> Result<()> {
        info!(entries = self.messages.len(), "closing session");
        if let Err(e) = self.host.shutdown().await {
            warn!(error = %e, "tool host did not shut down cleanly");
            return Err(e.into());
        }
        Ok(())
    }
}

fn success(call: &ToolCall, output: Value) -> ToolResult {
    ToolResult::Success {
        tool_call_id: call.id.clone(),
        output,
    }
}
