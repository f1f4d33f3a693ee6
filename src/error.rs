//! Error types for study-buddy
//!
//! The data store and session manager never fail: a missing record is a
//! no-op and a rejected credential is an [`AuthFailure`]. `Error` covers
//! the surfaces around them (storage backends, config, the CLI).
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, not logged in, unknown task, rejected credentials)
//! - 4: Operation failed (I/O, serialization, lock timeout)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the buddy CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for study-buddy operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task id prefix is ambiguous: {prefix} matches {count} tasks")]
    AmbiguousTask { prefix: String, count: usize },

    #[error("{0}")]
    Auth(#[from] AuthFailure),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::NotLoggedIn
            | Error::TaskNotFound(_)
            | Error::AmbiguousTask { .. }
            | Error::Auth(_) => exit_codes::USER_ERROR,

            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::LockFailed(_)
            | Error::StorageUnavailable(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for the JSON error envelope, if any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::TaskNotFound(id) => Some(serde_json::json!({ "task_id": id })),
            Error::AmbiguousTask { prefix, count } => {
                Some(serde_json::json!({ "prefix": prefix, "matches": count }))
            }
            Error::LockFailed(path) => Some(serde_json::json!({ "path": path })),
            _ => None,
        }
    }
}

/// Result type alias for study-buddy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Why a signup or login attempt was rejected.
///
/// The `Display` text is the exact message shown to the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("Username already exists")]
    UsernameTaken,

    #[error("Username must be 3-20 characters")]
    UsernameLength,

    #[error("Password must be at least 8 characters")]
    PasswordTooShort,

    #[error("Password must contain at least one special character")]
    PasswordMissingSpecial,

    #[error("User not found")]
    UserNotFound,

    #[error("Incorrect password")]
    IncorrectPassword,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_are_user_errors() {
        let err = Error::from(AuthFailure::UserNotFound);
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert_eq!(err.to_string(), "User not found");
    }

    #[test]
    fn io_errors_are_operation_failures() {
        let err = Error::from(std::io::Error::other("disk gone"));
        assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
    }

    #[test]
    fn ambiguous_task_carries_details() {
        let err = Error::AmbiguousTask {
            prefix: "ab".to_string(),
            count: 2,
        };
        let details = err.details().expect("details");
        assert_eq!(details["matches"], 2);
    }
}
