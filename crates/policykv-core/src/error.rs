//! Shared error type across policykv crates.

use thiserror::Error;

/// Caller-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Create on a live identifier.
    AlreadyExists,
    /// Get/Update/Delete on a missing identifier.
    NotFound,
    /// Payload present but undecodable.
    Corrupt,
    /// Backing store call failed.
    Unavailable,
    /// Invalid input (policy or config).
    BadRequest,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::AlreadyExists => "ALREADY_EXISTS",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Corrupt => "CORRUPT",
            ErrorCode::Unavailable => "UNAVAILABLE",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PolicyStoreError>;

/// Unified error type used by core and store.
#[derive(Debug, Error)]
pub enum PolicyStoreError {
    #[error("policy already exists: {0}")]
    AlreadyExists(String),
    #[error("policy not found: {0}")]
    NotFound(String),
    #[error("corrupt record at {key}: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl PolicyStoreError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            PolicyStoreError::AlreadyExists(_) => ErrorCode::AlreadyExists,
            PolicyStoreError::NotFound(_) => ErrorCode::NotFound,
            PolicyStoreError::Corrupt { .. } => ErrorCode::Corrupt,
            PolicyStoreError::Unavailable(_) => ErrorCode::Unavailable,
            PolicyStoreError::BadRequest(_) => ErrorCode::BadRequest,
            PolicyStoreError::Internal(_) => ErrorCode::Internal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PolicyStoreError::NotFound(_))
    }
}
