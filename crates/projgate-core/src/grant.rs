//! Access grants: "this email may see this project".

use serde::{Deserialize, Serialize};

use crate::types::{GrantId, ProjectId};

/// A persisted access grant.
///
/// At most one grant exists per `(project_id, email)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub id: GrantId,
    pub project_id: ProjectId,
    pub email: String,
}

/// A grant that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGrant {
    pub project_id: ProjectId,
    pub email: String,
}

impl NewGrant {
    pub fn new(project_id: ProjectId, email: impl Into<String>) -> Self {
        Self {
            project_id,
            email: email.into(),
        }
    }
}
