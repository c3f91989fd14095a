use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the tool host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum ToolError {
    /// Spawning, handshake, or channel I/O with the host failed.
    #[error("transport: {0}")]
    Transport(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The host ran the tool and reported a failure.
    #[error("execution failed: {0}")]
    Execution(String),
}
