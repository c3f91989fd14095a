//! Tool execution and MCP integration.

pub mod errors;
mod host;
mod host_kind;
mod mcp_client;
mod mcp_host;
mod types;

pub use errors::ToolError;
pub use host::ToolHost;
pub use host_kind::{HostCommands, HostKind};
pub use mcp_client::McpClient;
pub use mcp_host::McpToolHost;
pub use types::ToolArguments;
