use std::path::PathBuf;

use thiserror::Error;

use crate::model::ModelError;
use crate::tools::ToolError;

#[derive(Debug, Error)]
pub enum Error {
    /// The host script is neither a `.py` nor a `.js` file.
    #[error("unsupported tool host {}: expected a .py or .js script", path.display())]
    UnsupportedHostKind { path: PathBuf },

    #[error("model: {0}")]
    Model(#[from] ModelError),

    #[error("tool: {0}")]
    Tool(#[from] ToolError),

    /// The model kept requesting tools past the configured bound.
    #[error("tool round limit of {0} reached")]
    RoundLimit(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
