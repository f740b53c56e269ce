//! Error types for thingsctl
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad input, unknown or ambiguous name, terminal state)
//! - 3: Things is not accessible
//! - 4: Operation failed (script error, I/O)

use thiserror::Error;

use crate::model::{Candidate, EntityKind, TaskStatus};

/// Exit codes for the thingsctl CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const NOT_ACCESSIBLE: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for thingsctl operations
#[derive(Error, Debug)]
pub enum Error {
    // Things unreachable (exit code 3)
    #[error("{app} is not accessible: {reason}. Make sure {app} is installed and running")]
    NotAccessible { app: String, reason: String },

    // User errors (exit code 2)
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },

    #[error("{}", ambiguous_message(.name, .candidates))]
    AmbiguousName {
        name: String,
        candidates: Vec<Candidate>,
    },

    #[error("Task \"{name}\" is already {status}")]
    AlreadyInTerminalState { name: String, status: TaskStatus },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("Script execution failed: {0}")]
    ExecutionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn ambiguous_message(name: &str, candidates: &[Candidate]) -> String {
    let mut lines = vec![format!(
        "Multiple tasks named \"{name}\" found ({}):",
        candidates.len()
    )];
    for candidate in candidates {
        lines.push(format!("  - {}", candidate.describe()));
    }
    lines.push("Rename one of them in Things to target it unambiguously".to_string());
    lines.join("\n")
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_)
            | Error::NotFound { .. }
            | Error::AmbiguousName { .. }
            | Error::AlreadyInTerminalState { .. }
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::NotAccessible { .. } => exit_codes::NOT_ACCESSIBLE,

            Error::ExecutionFailed(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::Other(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Discriminant for programmatic callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotAccessible { .. } => "not_accessible",
            Error::Validation(_) => "validation",
            Error::NotFound { .. } => "not_found",
            Error::AmbiguousName { .. } => "ambiguous_name",
            Error::AlreadyInTerminalState { .. } => "already_in_terminal_state",
            Error::InvalidConfig(_) => "invalid_config",
            Error::ExecutionFailed(_) => "execution_failed",
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::Other(_) => "operation_failed",
        }
    }

    /// Structured fields for errors that carry them.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::NotAccessible { app, .. } => Some(serde_json::json!({ "app": app })),
            Error::NotFound { kind, name } => Some(serde_json::json!({
                "entity": kind,
                "name": name,
            })),
            Error::AmbiguousName { name, candidates } => Some(serde_json::json!({
                "name": name,
                "candidates": candidates,
            })),
            Error::AlreadyInTerminalState { name, status } => Some(serde_json::json!({
                "name": name,
                "status": status,
            })),
            Error::InvalidConfig(message) => Some(serde_json::json!({ "message": message })),
            _ => None,
        }
    }
}

/// Result type alias for thingsctl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub success: bool,
    pub error: String,
    pub kind: &'static str,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            success: false,
            error: err.to_string(),
            kind: err.kind(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
