//! The Engine: every project and grant operation, with its checks.
//!
//! Each operation is one request's worth of work: read, check, write. The
//! writes lean on store constraints, so a request that loses a race against
//! a concurrent one fails the same way the pre-check would have.

use projgate_access::{require_access, require_visibility, VisibilitySet};
use projgate_core::{
    normalize_email, validate_project_name, AuthUser, Grant, GrantId, NewGrant, NewProject,
    Project, ProjectId, ProjectPatch,
};
use projgate_store::{DeleteResult, Store, StoreError, UserDirectory};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

/// Remediation hint returned when a delete is blocked by dependent rows.
pub const DELETE_BLOCKED_MESSAGE: &str =
    "Empty Project Files and User Access before Deleting Project";

const DUPLICATE_PROJECT_MESSAGE: &str =
    "A project with similar name already exists. Please specify a different name";

const DUPLICATE_GRANT_MESSAGE: &str = "User already has access to project.";

/// The access control engine.
///
/// Generic over the project/grant store and the user directory, which may
/// be the same object (see [`SqliteStore`](projgate_store::SqliteStore)).
pub struct Engine<S: Store, D: UserDirectory> {
    store: S,
    directory: D,
    config: EngineConfig,
}

impl<S: Store, D: UserDirectory> Engine<S, D> {
    /// Create a new engine.
    pub fn new(store: S, directory: D, config: EngineConfig) -> Self {
        Self {
            store,
            directory,
            config,
        }
    }

    /// Get the user directory reference.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Project Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a project owned by `owner`.
    pub async fn create_project(&self, name: &str, owner: &AuthUser) -> Result<ProjectId> {
        let name = validate_project_name(name, self.config.max_name_len)?;

        if !self.find_projects_by_name(&name).await?.is_empty() {
            return Err(EngineError::AlreadyExists(DUPLICATE_PROJECT_MESSAGE.into()));
        }

        let id = self
            .store
            .insert_project(&NewProject::new(name.as_str(), owner.id))
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => {
                    EngineError::AlreadyExists(DUPLICATE_PROJECT_MESSAGE.into())
                }
                other => EngineError::Store(other),
            })?;

        info!(project_id = %id, owner = %owner.id, name = %name, "project created");
        Ok(id)
    }

    /// Projects with exactly this name.
    pub async fn find_projects_by_name(&self, name: &str) -> Result<Vec<Project>> {
        Ok(self.store.find_projects_by_name(name).await?)
    }

    /// Every project `actor` may list.
    ///
    /// Admins get all projects in store order. Everyone else gets owned
    /// projects followed by projects granted to their email, each once.
    pub async fn list_visible_projects(&self, actor: &AuthUser) -> Result<Vec<Project>> {
        let set = if actor.is_admin() {
            VisibilitySet::everything(self.store.list_projects().await?)
        } else {
            let owned = self.store.list_projects_by_owner(actor.id).await?;

            let granted = self
                .store
                .list_projects_granted_to(&normalize_email(&actor.email))
                .await?;

            VisibilitySet::merge(owned, granted)
        };

        debug!(actor = %actor.id, count = set.len(), "listed visible projects");
        Ok(set.into_projects())
    }

    /// Fetch a project `actor` may see.
    pub async fn get_project(&self, id: ProjectId, actor: &AuthUser) -> Result<Project> {
        let project = self.fetch_project(id).await?;

        let grants = if require_access(actor, Some(&project)).is_ok() {
            Vec::new()
        } else {
            self.store.list_grants_for_project(id).await?
        };

        if let Err(e) = require_visibility(actor, Some(&project), &grants) {
            warn!(actor = %actor.id, project_id = %id, "project read denied");
            return Err(e.into());
        }
        Ok(project)
    }

    /// Apply `patch` to a project `actor` may mutate.
    pub async fn update_project(
        &self,
        id: ProjectId,
        patch: &ProjectPatch,
        actor: &AuthUser,
    ) -> Result<()> {
        let mut project = self.fetch_project(id).await?;
        self.check_required_access(actor, &project)?;

        let mut patch = patch.clone();
        if let Some(ref name) = patch.project_name {
            patch.project_name = Some(validate_project_name(name, self.config.max_name_len)?);
        }

        if !patch.apply(&mut project) {
            debug!(project_id = %id, "update left project unchanged");
            return Ok(());
        }

        let updated = self
            .store
            .update_project(&project)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => {
                    EngineError::AlreadyExists(DUPLICATE_PROJECT_MESSAGE.into())
                }
                other => EngineError::Store(other),
            })?;
        if !updated {
            return Err(EngineError::NotFound(format!("project {}", id)));
        }

        info!(project_id = %id, actor = %actor.id, name = %project.project_name, "project updated");
        Ok(())
    }

    /// Delete a project `actor` may mutate.
    ///
    /// Fails with [`EngineError::Validation`] while grants or files still
    /// reference the project; the project stays in place.
    pub async fn delete_project(&self, id: ProjectId, actor: &AuthUser) -> Result<()> {
        let project = self.fetch_project(id).await?;
        self.check_required_access(actor, &project)?;

        match self.store.delete_project(id).await {
            Ok(DeleteResult::Deleted) => {
                info!(project_id = %id, actor = %actor.id, "project deleted");
                Ok(())
            }
            Ok(DeleteResult::Missing) => Err(EngineError::NotFound(format!("project {}", id))),
            Err(StoreError::ForeignKeyViolation(_)) => {
                warn!(project_id = %id, "project delete blocked by dependents");
                Err(EngineError::Validation(DELETE_BLOCKED_MESSAGE.into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Grant Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Grants on a project.
    ///
    /// Not gated here: callers are expected to have checked project access.
    pub async fn list_grantees(&self, project_id: ProjectId) -> Result<Vec<Grant>> {
        Ok(self.store.list_grants_for_project(project_id).await?)
    }

    /// Let `email` see a project.
    pub async fn grant_access(&self, project_id: ProjectId, email: &str) -> Result<GrantId> {
        let email = normalize_email(email);

        if !self.directory.exists(&email).await? {
            return Err(EngineError::NotFound("User not found.".into()));
        }

        let grantees = self.list_grantees(project_id).await?;
        if grantees.iter().any(|g| g.email == email) {
            return Err(EngineError::AlreadyExists(DUPLICATE_GRANT_MESSAGE.into()));
        }

        let id = self
            .store
            .insert_grant(&NewGrant::new(project_id, email.as_str()))
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => {
                    EngineError::AlreadyExists(DUPLICATE_GRANT_MESSAGE.into())
                }
                StoreError::ForeignKeyViolation(_) => {
                    EngineError::NotFound(format!("project {}", project_id))
                }
                other => EngineError::Store(other),
            })?;

        info!(grant_id = %id, project_id = %project_id, email = %email, "access granted");
        Ok(id)
    }

    /// Remove a grant by id. An unknown id fails with `NotFound`.
    pub async fn revoke_access(&self, grant_id: GrantId) -> Result<()> {
        match self.store.delete_grant(grant_id).await? {
            DeleteResult::Deleted => {
                info!(grant_id = %grant_id, "access revoked");
                Ok(())
            }
            DeleteResult::Missing => Err(EngineError::NotFound(format!("grant {}", grant_id))),
        }
    }

    /// Fetch a grant by id.
    pub async fn get_grant(&self, grant_id: GrantId) -> Result<Grant> {
        self.store
            .get_grant(grant_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("grant {}", grant_id)))
    }

    /// Run the required-access check for `actor` on a project and return it.
    ///
    /// For callers gating grant management, which the grant operations
    /// themselves leave to the layer above.
    pub async fn authorize(&self, project_id: ProjectId, actor: &AuthUser) -> Result<Project> {
        let project = self.fetch_project(project_id).await?;
        self.check_required_access(actor, &project)?;
        Ok(project)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    async fn fetch_project(&self, id: ProjectId) -> Result<Project> {
        self.store
            .get_project(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("project {}", id)))
    }

    fn check_required_access(&self, actor: &AuthUser, project: &Project) -> Result<()> {
        require_access(actor, Some(project)).map_err(|e| {
            warn!(actor = %actor.id, project_id = %project.id, "mutation denied");
            EngineError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projgate_core::{Role, UserId};
    use projgate_store::MemoryStore;
    use std::sync::Arc;

    fn engine() -> (Engine<Arc<MemoryStore>, Arc<MemoryStore>>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let engine = Engine::new(store.clone(), store.clone(), EngineConfig::default());
        (engine, store)
    }

    fn user(id: i64, email: &str) -> AuthUser {
        AuthUser::new(UserId(id), email, Role::User)
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (engine, _) = engine();
        let err = engine.create_project("  ", &user(1, "u1@example.com")).await;
        assert!(matches!(err, Err(EngineError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_long_name() {
        let store = Arc::new(MemoryStore::new());
        let engine = Engine::new(store.clone(), store, EngineConfig { max_name_len: 4 });
        let err = engine.create_project("Alpha", &user(1, "u1@example.com")).await;
        assert!(matches!(err, Err(EngineError::Validation(_))));
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let (engine, _) = engine();
        let owner = user(1, "u1@example.com");
        engine.create_project("Alpha", &owner).await.unwrap();

        let err = engine.create_project("Alpha", &user(2, "u2@example.com")).await;
        assert!(matches!(err, Err(EngineError::AlreadyExists(_))));
        assert_eq!(engine.find_projects_by_name("Alpha").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_project() {
        let (engine, _) = engine();
        let err = engine.get_project(ProjectId(5), &user(1, "u1@example.com")).await;
        assert!(matches!(err, Err(EngineError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_patch_is_noop() {
        let (engine, _) = engine();
        let owner = user(1, "u1@example.com");
        let id = engine.create_project("Alpha", &owner).await.unwrap();

        engine
            .update_project(id, &ProjectPatch::default(), &owner)
            .await
            .unwrap();
        assert_eq!(engine.get_project(id, &owner).await.unwrap().project_name, "Alpha");
    }

    #[tokio::test]
    async fn test_rename_into_taken_name() {
        let (engine, _) = engine();
        let owner = user(1, "u1@example.com");
        engine.create_project("Alpha", &owner).await.unwrap();
        let beta = engine.create_project("Beta", &owner).await.unwrap();

        let err = engine
            .update_project(beta, &ProjectPatch::rename("Alpha"), &owner)
            .await;
        assert!(matches!(err, Err(EngineError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_grant_unknown_user() {
        let (engine, _) = engine();
        let owner = user(1, "u1@example.com");
        let id = engine.create_project("Alpha", &owner).await.unwrap();

        let err = engine.grant_access(id, "ghost@example.com").await;
        assert!(matches!(err, Err(EngineError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_grant_on_missing_project() {
        let (engine, store) = engine();
        store.register_user("u2@example.com", Role::User).await.unwrap();

        let err = engine.grant_access(ProjectId(77), "u2@example.com").await;
        assert!(matches!(err, Err(EngineError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_grant_normalizes_email() {
        let (engine, store) = engine();
        store.register_user("u2@example.com", Role::User).await.unwrap();
        let owner = user(1, "u1@example.com");
        let id = engine.create_project("Alpha", &owner).await.unwrap();

        engine.grant_access(id, " U2@Example.com").await.unwrap();
        let err = engine.grant_access(id, "u2@example.com").await;
        assert!(matches!(err, Err(EngineError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_revoke_missing_grant() {
        let (engine, _) = engine();
        let err = engine.revoke_access(GrantId(3)).await;
        assert!(matches!(err, Err(EngineError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_authorize_follows_required_access() {
        let (engine, store) = engine();
        let owner = user(1, "u1@example.com");
        let id = engine.create_project("Alpha", &owner).await.unwrap();
        let admin = store.register_user("root@example.com", Role::Admin).await.unwrap();

        assert_eq!(engine.authorize(id, &owner).await.unwrap().id, id);
        assert!(engine.authorize(id, &admin).await.is_ok());
        assert!(matches!(
            engine.authorize(id, &user(2, "u2@example.com")).await,
            Err(EngineError::Unauthorized(_))
        ));
        assert!(matches!(
            engine.authorize(ProjectId(99), &owner).await,
            Err(EngineError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_grant() {
        let (engine, store) = engine();
        store.register_user("u2@example.com", Role::User).await.unwrap();
        let owner = user(1, "u1@example.com");
        let id = engine.create_project("Alpha", &owner).await.unwrap();
        let grant = engine.grant_access(id, "u2@example.com").await.unwrap();

        let found = engine.get_grant(grant).await.unwrap();
        assert_eq!(found.project_id, id);
        assert_eq!(found.email, "u2@example.com");

        engine.revoke_access(grant).await.unwrap();
        assert!(matches!(
            engine.get_grant(grant).await,
            Err(EngineError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_file() {
        let (engine, store) = engine();
        let owner = user(1, "u1@example.com");
        let id = engine.create_project("Alpha", &owner).await.unwrap();
        let file = store.attach_file(id, "brief.docx").await.unwrap();

        match engine.delete_project(id, &owner).await {
            Err(EngineError::Validation(msg)) => assert_eq!(msg, DELETE_BLOCKED_MESSAGE),
            other => panic!("expected validation error, got {:?}", other),
        }

        store.detach_file(file).await.unwrap();
        engine.delete_project(id, &owner).await.unwrap();
        assert!(matches!(
            engine.get_project(id, &owner).await,
            Err(EngineError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_project_read_rule() {
        let (engine, store) = engine();
        let owner = store.register_user("u1@example.com", Role::User).await.unwrap();
        let grantee = store.register_user("u2@example.com", Role::User).await.unwrap();
        let stranger = store.register_user("u3@example.com", Role::User).await.unwrap();
        let admin = store.register_user("root@example.com", Role::Admin).await.unwrap();

        let id = engine.create_project("Alpha", &owner).await.unwrap();
        engine.grant_access(id, &grantee.email).await.unwrap();

        for actor in [&owner, &grantee, &admin] {
            assert_eq!(engine.get_project(id, actor).await.unwrap().id, id);
        }
        assert!(matches!(
            engine.get_project(id, &stranger).await,
            Err(EngineError::Unauthorized(_))
        ));
    }
}
