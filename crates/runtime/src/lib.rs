//! Ferry runtime: a chat mediator between an LLM and one MCP tool host.
//!
//! The runtime is organized around these concepts:
//!
//! - **Session**: owns the transcript, forwards queries to the model, and
//!   dispatches the tool calls the model asks for.
//! - **Backend**: a trait abstracting LLM providers (Anthropic, etc.).
//! - **ToolHost**: a trait abstracting the tool process; [`McpToolHost`]
//!   runs an MCP server script as a child process.
//!
//! # Example
//!
//! ```ignore
//! use ferry_runtime::{AnthropicBackend, HostCommands, McpToolHost, Session, SessionConfig};
//!
//! # async fn example() -> ferry_runtime::Result<()> {
//! let host = McpToolHost::connect("weather.py", &HostCommands::default()).await?;
//! let backend = AnthropicBackend::builder("sk-ant-api01-...", "claude-sonnet-4-20250514").build();
//!
//! let mut session = Session::new(backend, host, SessionConfig::default());
//! let answer = session.run_query("Any weather alerts in CA?").await?;
//! println!("{answer}");
//! session.end().await?;
//! # Ok(())
//! # }
//! ```

mod chat_loop;
mod error;
pub mod model;
pub mod providers;
mod session;
#[cfg(test)]
mod testing;
pub mod tools;

pub use error::{Error, Result};
pub use model::{Backend, Message, ModelError, Part, Role, ToolCall, ToolResult, ToolSpec};
pub use providers::{AnthropicBackend, AnthropicBackendBuilder};
pub use session::{Session, SessionConfig};
pub use tools::{HostCommands, HostKind, McpToolHost, ToolError, ToolHost};
