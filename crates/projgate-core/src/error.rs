//! Error types for projgate core.

use thiserror::Error;

/// Errors raised while validating domain input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid project name: {0}")]
    InvalidName(String),

    #[error("invalid email: {0}")]
    InvalidEmail(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
