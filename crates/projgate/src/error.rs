//! Error types for the engine.
//!
//! Every operation fails with one of four domain kinds. Storage failures
//! that are not constraint violations surface as [`EngineError::Store`].

use projgate_access::AccessError;
use projgate_core::CoreError;
use projgate_store::StoreError;
use thiserror::Error;

/// Errors returned by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A referenced project, grant, or user does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate project name, or duplicate grant for an email on a project.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The actor failed the access check.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed input, or a delete blocked by dependent rows.
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage failure unrelated to the request's content.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<AccessError> for EngineError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::ProjectNotFound => EngineError::NotFound("project not found".into()),
            AccessError::Unauthorized { .. } => EngineError::Unauthorized(e.to_string()),
        }
    }
}

impl From<CoreError> for EngineError {
    fn from(e: CoreError) -> Self {
        EngineError::Validation(e.to_string())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
