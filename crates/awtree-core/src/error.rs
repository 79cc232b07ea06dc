//! Error types for awtree

use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error type for awtree operations
#[derive(Debug, Error)]
pub enum AwtreeError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Schema shape error: {0}")]
    SchemaShapeError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error at {}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl AwtreeError {
    /// Wrap an I/O failure together with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        AwtreeError::IoError {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Short category name, matching the taxonomy used in console output
    pub fn kind(&self) -> &'static str {
        match self {
            AwtreeError::ParseError(_) => "ParseError",
            AwtreeError::SchemaShapeError(_) => "SchemaShapeError",
            AwtreeError::ValidationError(_) => "ValidationError",
            AwtreeError::IoError { .. } => "IOError",
            AwtreeError::ConfigError(_) => "ConfigError",
        }
    }
}

/// Result type alias for awtree operations
pub type Result<T> = std::result::Result<T, AwtreeError>;

impl From<serde_json::Error> for AwtreeError {
    fn from(err: serde_json::Error) -> Self {
        AwtreeError::ParseError(err.to_string())
    }
}

impl From<toml::de::Error> for AwtreeError {
    fn from(err: toml::de::Error) -> Self {
        AwtreeError::ConfigError(err.to_string())
    }
}
