//! Error types for Good-Bots.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoodBotsError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Unexpected response shape: {0}")]
    Schema(String),

    #[error("Invalid IP specification '{spec}': {reason}")]
    Parse { spec: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Path traversal detected in '{0}'. Use of '..' in paths is not allowed")]
    PathSecurity(String),

    #[error("File system error: {0}")]
    Io(String),
}

impl GoodBotsError {
    /// Whether this error must abort the whole run.
    ///
    /// Provider and per-entry failures are skipped with a warning; a bad
    /// additional-bots file, an unsafe output path or a failed write are not.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GoodBotsError::Config(_) | GoodBotsError::PathSecurity(_) | GoodBotsError::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GoodBotsError>;
