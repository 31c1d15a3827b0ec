//! Error types for Ringside.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for Ringside operations.
#[derive(Debug, Error)]
pub enum RingsideError {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading game data or engine settings.
///
/// None of these reach the per-frame fight loop: a fight always runs on a
/// fully-defaulted configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read file
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// Document could not be parsed
    #[error("Failed to parse {path}: {reason}")]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Document parsed but holds unusable values
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Result type alias for Ringside operations.
pub type RingsideResult<T> = Result<T, RingsideError>;
