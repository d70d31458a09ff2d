//! Projects and the partial updates applied to them.

use serde::{Deserialize, Serialize};

use crate::types::{ProjectId, UserId};

/// A persisted project.
///
/// `project_name` is unique across all existing projects. The owner is the
/// identity that created it and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub project_name: String,
    pub owner_user_id: UserId,
}

impl Project {
    /// Whether `user` is the owner of this project.
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_user_id == user
    }
}

/// A project that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub project_name: String,
    pub owner_user_id: UserId,
}

impl NewProject {
    pub fn new(project_name: impl Into<String>, owner_user_id: UserId) -> Self {
        Self {
            project_name: project_name.into(),
            owner_user_id,
        }
    }
}

/// Partial update for a project. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

impl ProjectPatch {
    /// Patch that renames the project.
    pub fn rename(project_name: impl Into<String>) -> Self {
        Self {
            project_name: Some(project_name.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.project_name.is_none()
    }

    /// Apply the patch, returning whether anything changed.
    pub fn apply(&self, project: &mut Project) -> bool {
        let mut changed = false;
        if let Some(ref name) = self.project_name {
            if *name != project.project_name {
                project.project_name = name.clone();
                changed = true;
            }
        }
        changed
    }
}
