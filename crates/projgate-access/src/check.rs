//! Authorization predicates.

use projgate_core::{normalize_email, AuthUser, Grant, Project, Role};

use crate::error::{AccessError, Result};

/// The Required-Access Check gating every mutation of a project.
///
/// Admins pass unconditionally; everyone else must own the project.
pub fn require_access(actor: &AuthUser, project: Option<&Project>) -> Result<()> {
    let project = project.ok_or(AccessError::ProjectNotFound)?;

    match actor.role {
        Role::Admin => Ok(()),
        Role::User if project.is_owned_by(actor.id) => Ok(()),
        Role::User => Err(AccessError::Unauthorized {
            actor: actor.id,
            project: project.id,
        }),
    }
}

/// Whether `actor` may see `project`, given the grants recorded on it.
///
/// Grants for other projects in `grants` are ignored.
pub fn can_view(actor: &AuthUser, project: &Project, grants: &[Grant]) -> bool {
    if require_access(actor, Some(project)).is_ok() {
        return true;
    }

    let email = normalize_email(&actor.email);
    grants
        .iter()
        .any(|g| g.project_id == project.id && g.email == email)
}

/// Read gate for fetching a single project.
pub fn require_visibility(
    actor: &AuthUser,
    project: Option<&Project>,
    grants: &[Grant],
) -> Result<()> {
    let project = project.ok_or(AccessError::ProjectNotFound)?;

    if can_view(actor, project, grants) {
        Ok(())
    } else {
        Err(AccessError::Unauthorized {
            actor: actor.id,
            project: project.id,
        })
    }
}
