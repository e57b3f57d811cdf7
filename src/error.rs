// src/error.rs

//! Error types for the recipe library

use thiserror::Error;

/// Errors raised while reading, validating or cooking a recipe
///
/// Native build failures keep the tool's output verbatim so callers see
/// exactly what CMake or the compiler reported.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Requirement {reference} is not pinned to an exact version: {reason}")]
    Unpinned { reference: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Dependency resolution failed: {0}")]
    ResolutionError(String),

    #[error("Configure failed: {0}")]
    ConfigureFailed(String),

    #[error("Build failed: {0}")]
    BuildFailed(String),

    #[error("Install failed: {0}")]
    InstallFailed(String),

    #[error("Stage {stage} reached out of order (current stage: {current})")]
    StageOrder { stage: String, current: String },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ParseError(err.to_string())
    }
}

/// Result alias for recipe operations
pub type Result<T> = std::result::Result<T, Error>;
