//! Error types for access checks.

use projgate_core::{ProjectId, UserId};
use thiserror::Error;

/// Why an access check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The project being checked does not exist.
    #[error("project not found")]
    ProjectNotFound,

    /// The actor holds no right over the project.
    #[error("user {actor} is not authorized for project {project}")]
    Unauthorized { actor: UserId, project: ProjectId },
}

/// Result type for access checks.
pub type Result<T> = std::result::Result<T, AccessError>;
