use std::path::PathBuf;

use batch2d_text::FontError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed sprite atlas line {line}: {content:?}")]
    MalformedUvLine { line: usize, content: String },

    #[error("invalid atlas size {width}x{height}")]
    InvalidAtlasSize { width: u32, height: u32 },

    #[error("font error: {0}")]
    Font(#[from] FontError),

    #[error("invalid renderer configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown sprite: {0}")]
    UnknownSprite(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
