//! Tool host trait.

use crate::model::{ToolCall, ToolSpec};
use crate::tools::ToolError;
use serde_json::Value;
use std::future::Future;

/// Trait for tool execution hosts.
///
/// Implementations advertise tool specifications and execute tool calls.
/// This is the boundary between the model loop and side effects.
pub trait ToolHost: Send + Sync {
    /// Fetch the tools currently offered by the host.
    ///
    /// Called once per query; the tool set may change between turns.
    fn list_tools(&self) -> impl Future<Output = Result<Vec<ToolSpec>, ToolError>> + Send;

    /// Execute a tool call.
    fn call_tool(&self, call: &ToolCall) -> impl Future<Output = Result<Value, ToolError>> + Send;

    /// Close the channel and stop the host.
    fn shutdown(self) -> impl Future<Output = Result<(), ToolError>> + Send
    where
        Self: Sized;
}
