//! Error types for taskdeck
//!
//! Three failure families:
//! - Validation: the operation is rejected locally, no backend call is made
//! - Backend: the persistence backend failed; surfaced as a notification,
//!   never fatal
//! - Infrastructure: IO/serialization/locking errors from the file backend

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for taskdeck operations
#[derive(Error, Debug)]
pub enum Error {
    // Validation failures
    #[error("Task title cannot be empty")]
    EmptyTitle,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Backend failures (transport, authorization, constraint)
    #[error("Backend error: {0}")]
    Backend(String),

    // Infrastructure failures
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),
}

impl Error {
    /// Whether the error is a local validation failure (never reached the
    /// backend) as opposed to a backend or infrastructure failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::EmptyTitle | Error::InvalidConfig(_))
    }

    /// Backend-facing description used for user-visible notifications.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

/// Result type alias for taskdeck operations
pub type Result<T> = std::result::Result<T, Error>;
