use thiserror::Error;

/// Errors from a model call.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The request never got an HTTP response.
    #[error("network: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The provider response could not be parsed.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// The response carried no text or tool-use block.
    #[error("provider returned an empty response")]
    EmptyResponse,
}

impl ModelError {
    /// Whether the provider reported it was overloaded or rate limited.
    pub fn is_overloaded(&self) -> bool {
        matches!(self, Self::Api { status: 429 | 529, .. })
    }
}
