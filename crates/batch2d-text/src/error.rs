use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading a font atlas description.
#[derive(Error, Debug)]
pub enum FontError {
    #[error("failed to read font description {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed font description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid font metrics: {0}")]
    InvalidMetrics(String),
}

pub type Result<T> = std::result::Result<T, FontError>;
