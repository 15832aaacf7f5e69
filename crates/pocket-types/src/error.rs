//! Error types for pocket.

use std::io;

/// Errors produced by the pocket libraries.
#[derive(Debug, thiserror::Error)]
pub enum PocketError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("VFS error: {0}")]
    Vfs(String),

    #[error("INI error: {0}")]
    Ini(String),

    #[error("image error: {0}")]
    Image(String),

    #[error("platform error: {0}")]
    Platform(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("PNG encode error: {0}")]
    PngEncode(#[from] png::EncodingError),
}

impl From<png::DecodingError> for PocketError {
    fn from(e: png::DecodingError) -> Self {
        Self::Image(e.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PocketError>;
