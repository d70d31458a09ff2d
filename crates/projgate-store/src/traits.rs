//! Store traits: the abstract interfaces for project, grant, and user lookup.
//!
//! These traits keep the engine storage-agnostic. Implementations include
//! SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use projgate_core::{AuthUser, Grant, GrantId, NewGrant, NewProject, Project, ProjectId, UserId};

use crate::error::Result;

/// Result of deleting a row by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteResult {
    /// The row existed and was removed.
    Deleted,
    /// No row had that id.
    Missing,
}

/// The Store trait: async interface for project and grant persistence.
///
/// # Constraints
///
/// - `insert_project` and `update_project` fail with `UniqueViolation` when the
///   name is already taken by another project.
/// - `insert_grant` fails with `UniqueViolation` on a duplicate `(project, email)`
///   and `ForeignKeyViolation` when the project does not exist.
/// - `delete_project` fails with `ForeignKeyViolation` while grants or files
///   still reference the project. The check and the delete are one atomic step.
/// - All list operations return rows ordered by id.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Project Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a project and return its id.
    async fn insert_project(&self, project: &NewProject) -> Result<ProjectId>;

    /// Get a project by id.
    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>>;

    /// Get all projects with exactly this name (zero or one).
    async fn find_projects_by_name(&self, name: &str) -> Result<Vec<Project>>;

    /// List every project.
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// List projects owned by a user.
    async fn list_projects_by_owner(&self, owner: UserId) -> Result<Vec<Project>>;

    /// List projects with at least one grant naming `email`, each once.
    async fn list_projects_granted_to(&self, email: &str) -> Result<Vec<Project>>;

    /// Persist a modified project. Returns `false` if no row had its id.
    async fn update_project(&self, project: &Project) -> Result<bool>;

    /// Delete a project by id.
    async fn delete_project(&self, id: ProjectId) -> Result<DeleteResult>;

    // ─────────────────────────────────────────────────────────────────────────
    // Grant Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a grant and return its id.
    async fn insert_grant(&self, grant: &NewGrant) -> Result<GrantId>;

    /// Get a grant by id.
    async fn get_grant(&self, id: GrantId) -> Result<Option<Grant>>;

    /// List grants on a project.
    async fn list_grants_for_project(&self, project_id: ProjectId) -> Result<Vec<Grant>>;

    /// Delete a grant by id.
    async fn delete_grant(&self, id: GrantId) -> Result<DeleteResult>;
}

/// Directory of known user accounts.
///
/// Owned by the account system; the engine only reads it.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve an email to its account.
    async fn lookup(&self, email: &str) -> Result<Option<AuthUser>>;

    /// Whether an account with this email exists.
    async fn exists(&self, email: &str) -> Result<bool> {
        Ok(self.lookup(email).await?.is_some())
    }
}

#[async_trait]
impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    async fn insert_project(&self, project: &NewProject) -> Result<ProjectId> {
        (**self).insert_project(project).await
    }

    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>> {
        (**self).get_project(id).await
    }

    async fn find_projects_by_name(&self, name: &str) -> Result<Vec<Project>> {
        (**self).find_projects_by_name(name).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        (**self).list_projects().await
    }

    async fn list_projects_by_owner(&self, owner: UserId) -> Result<Vec<Project>> {
        (**self).list_projects_by_owner(owner).await
    }

    async fn list_projects_granted_to(&self, email: &str) -> Result<Vec<Project>> {
        (**self).list_projects_granted_to(email).await
    }

    async fn update_project(&self, project: &Project) -> Result<bool> {
        (**self).update_project(project).await
    }

    async fn delete_project(&self, id: ProjectId) -> Result<DeleteResult> {
        (**self).delete_project(id).await
    }

    async fn insert_grant(&self, grant: &NewGrant) -> Result<GrantId> {
        (**self).insert_grant(grant).await
    }

    async fn get_grant(&self, id: GrantId) -> Result<Option<Grant>> {
        (**self).get_grant(id).await
    }

    async fn list_grants_for_project(&self, project_id: ProjectId) -> Result<Vec<Grant>> {
        (**self).list_grants_for_project(project_id).await
    }

    async fn delete_grant(&self, id: GrantId) -> Result<DeleteResult> {
        (**self).delete_grant(id).await
    }
}

#[async_trait]
impl<D: UserDirectory + ?Sized> UserDirectory for std::sync::Arc<D> {
    async fn lookup(&self, email: &str) -> Result<Option<AuthUser>> {
        (**self).lookup(email).await
    }
}
