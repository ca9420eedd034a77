//! Error types for curl-template

use std::time::Duration;
use thiserror::Error;

/// Main error type for curl-template
#[derive(Error, Debug)]
pub enum CurlTemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expansion error: {0}")]
    Expansion(#[from] ExpansionError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    Argument(String),
}

impl CurlTemplateError {
    /// True for errors that mean "the input is not in this format"
    pub fn is_format_error(&self) -> bool {
        matches!(self, CurlTemplateError::Format(_) | CurlTemplateError::Json(_))
    }
}

/// Failures of a shell expansion pass
#[derive(Error, Debug)]
pub enum ExpansionError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("pipe to shell failed: {0}")]
    Pipe(#[source] std::io::Error),

    #[error("shell exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("{field} did not expand within {after:?}")]
    FieldTimeout { field: String, after: Duration },

    #[error("expansion did not finish within {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, CurlTemplateError>;
