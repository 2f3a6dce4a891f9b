//! Error types for the Pokédex client.
//!
//! Library crates use [`PokedexError`] via `thiserror`.
//! App crates (cli/tui) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Pokédex operations.
#[derive(Debug, thiserror::Error)]
pub enum PokedexError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error talking to the remote catalog API.
    #[error("network error: {0}")]
    Network(String),

    /// JSON decoding error for an API response body.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// Local key-value storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad id, malformed input, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PokedexError>;

impl PokedexError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a decode error from any displayable message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
