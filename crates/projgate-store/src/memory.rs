//! In-memory implementation of the store traits.
//!
//! Primarily for testing. It has the same semantics as SQLite: every
//! uniqueness and referential check runs under the same write guard as the
//! mutation it protects.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use projgate_core::{
    normalize_email, AuthUser, FileId, Grant, GrantId, NewGrant, NewProject, Project, ProjectId,
    Role, UserId,
};

use crate::error::{Result, StoreError};
use crate::traits::{DeleteResult, Store, UserDirectory};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    projects: BTreeMap<ProjectId, Project>,
    grants: BTreeMap<GrantId, Grant>,
    /// File id -> owning project.
    files: BTreeMap<FileId, ProjectId>,
    users: HashMap<String, AuthUser>,
    last_id: i64,
}

impl MemoryStoreInner {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn name_taken(&self, name: &str, except: Option<ProjectId>) -> bool {
        self.projects
            .values()
            .any(|p| p.project_name == name && Some(p.id) != except)
    }

    fn has_dependents(&self, id: ProjectId) -> bool {
        self.grants.values().any(|g| g.project_id == id)
            || self.files.values().any(|pid| *pid == id)
    }
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }

    /// Register a user account. Fails with `UniqueViolation` if the email is taken.
    pub async fn register_user(&self, email: &str, role: Role) -> Result<AuthUser> {
        let mut inner = self.write()?;
        let email = normalize_email(email);

        if inner.users.contains_key(&email) {
            return Err(StoreError::UniqueViolation(format!("user '{}'", email)));
        }

        let user = AuthUser {
            id: UserId(inner.next_id()),
            email: email.clone(),
            role,
        };
        inner.users.insert(email, user.clone());
        Ok(user)
    }

    /// Record a file attached to a project.
    pub async fn attach_file(&self, project_id: ProjectId, _file_name: &str) -> Result<FileId> {
        let mut inner = self.write()?;

        if !inner.projects.contains_key(&project_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "project {}",
                project_id
            )));
        }

        let id = FileId(inner.next_id());
        inner.files.insert(id, project_id);
        Ok(id)
    }

    /// Remove a file record.
    pub async fn detach_file(&self, file_id: FileId) -> Result<DeleteResult> {
        let mut inner = self.write()?;
        Ok(match inner.files.remove(&file_id) {
            Some(_) => DeleteResult::Deleted,
            None => DeleteResult::Missing,
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_project(&self, project: &NewProject) -> Result<ProjectId> {
        let mut inner = self.write()?;

        if inner.name_taken(&project.project_name, None) {
            return Err(StoreError::UniqueViolation(format!(
                "project name '{}'",
                project.project_name
            )));
        }

        let id = ProjectId(inner.next_id());
        inner.projects.insert(
            id,
            Project {
                id,
                project_name: project.project_name.clone(),
                owner_user_id: project.owner_user_id,
            },
        );
        Ok(id)
    }

    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>> {
        Ok(self.read()?.projects.get(&id).cloned())
    }

    async fn find_projects_by_name(&self, name: &str) -> Result<Vec<Project>> {
        Ok(self
            .read()?
            .projects
            .values()
            .filter(|p| p.project_name == name)
            .cloned()
            .collect())
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.read()?.projects.values().cloned().collect())
    }

    async fn list_projects_by_owner(&self, owner: UserId) -> Result<Vec<Project>> {
        Ok(self
            .read()?
            .projects
            .values()
            .filter(|p| p.owner_user_id == owner)
            .cloned()
            .collect())
    }

    async fn list_projects_granted_to(&self, email: &str) -> Result<Vec<Project>> {
        let inner = self.read()?;
        let granted: BTreeSet<ProjectId> = inner
            .grants
            .values()
            .filter(|g| g.email == email)
            .map(|g| g.project_id)
            .collect();

        Ok(granted
            .iter()
            .filter_map(|id| inner.projects.get(id).cloned())
            .collect())
    }

    async fn update_project(&self, project: &Project) -> Result<bool> {
        let mut inner = self.write()?;

        if !inner.projects.contains_key(&project.id) {
            return Ok(false);
        }
        if inner.name_taken(&project.project_name, Some(project.id)) {
            return Err(StoreError::UniqueViolation(format!(
                "project name '{}'",
                project.project_name
            )));
        }

        inner.projects.insert(project.id, project.clone());
        Ok(true)
    }

    async fn delete_project(&self, id: ProjectId) -> Result<DeleteResult> {
        let mut inner = self.write()?;

        if !inner.projects.contains_key(&id) {
            return Ok(DeleteResult::Missing);
        }
        if inner.has_dependents(id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "project {} has dependents",
                id
            )));
        }

        inner.projects.remove(&id);
        Ok(DeleteResult::Deleted)
    }

    async fn insert_grant(&self, grant: &NewGrant) -> Result<GrantId> {
        let mut inner = self.write()?;

        if !inner.projects.contains_key(&grant.project_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "grant for '{}' on project {}",
                grant.email, grant.project_id
            )));
        }
        if inner
            .grants
            .values()
            .any(|g| g.project_id == grant.project_id && g.email == grant.email)
        {
            return Err(StoreError::UniqueViolation(format!(
                "grant for '{}' on project {}",
                grant.email, grant.project_id
            )));
        }

        let id = GrantId(inner.next_id());
        inner.grants.insert(
            id,
            Grant {
                id,
                project_id: grant.project_id,
                email: grant.email.clone(),
            },
        );
        Ok(id)
    }

    async fn get_grant(&self, id: GrantId) -> Result<Option<Grant>> {
        Ok(self.read()?.grants.get(&id).cloned())
    }

    async fn list_grants_for_project(&self, project_id: ProjectId) -> Result<Vec<Grant>> {
        Ok(self
            .read()?
            .grants
            .values()
            .filter(|g| g.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn delete_grant(&self, id: GrantId) -> Result<DeleteResult> {
        let mut inner = self.write()?;
        Ok(match inner.grants.remove(&id) {
            Some(_) => DeleteResult::Deleted,
            None => DeleteResult::Missing,
        })
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn lookup(&self, email: &str) -> Result<Option<AuthUser>> {
        Ok(self.read()?.users.get(&normalize_email(email)).cloned())
    }
}
