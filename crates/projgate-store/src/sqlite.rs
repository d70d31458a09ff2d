//! SQLite implementation of the store traits.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via `tokio::task::spawn_blocking`. Uniqueness
//! and referential guards are schema constraints, so concurrent callers
//! cannot slip a duplicate or an orphan past a pre-check.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{ffi, params, Connection, OptionalExtension};

use projgate_core::{
    normalize_email, AuthUser, FileId, Grant, GrantId, NewGrant, NewProject, Project, ProjectId,
    Role, UserId,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{DeleteResult, Store, UserDirectory};

/// How long a writer waits on a locked database file before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. Cloning shares the same connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&mut guard)
        })
        .await
        .map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                ffi::Error::new(ffi::SQLITE_ERROR),
                Some(format!("spawn_blocking failed: {}", e)),
            ))
        })?
    }

    /// Register a user account. Fails with `UniqueViolation` if the email is taken.
    pub async fn register_user(&self, email: &str, role: Role) -> Result<AuthUser> {
        let email = normalize_email(email);

        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO users (email, role) VALUES (?1, ?2)",
                params![email, role.as_str()],
            )
            .map_err(|e| StoreError::from_sqlite(e, format!("user '{}'", email)))?;

            Ok(AuthUser {
                id: UserId(conn.last_insert_rowid()),
                email,
                role,
            })
        })
        .await
    }

    /// Record a file attached to a project.
    ///
    /// Files are owned by the file service; this is the write it performs.
    pub async fn attach_file(&self, project_id: ProjectId, file_name: &str) -> Result<FileId> {
        let file_name = file_name.to_string();

        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO project_files (project_id, file_name) VALUES (?1, ?2)",
                params![project_id.get(), file_name],
            )
            .map_err(|e| StoreError::from_sqlite(e, format!("project {}", project_id)))?;

            Ok(FileId(conn.last_insert_rowid()))
        })
        .await
    }

    /// Remove a file record.
    pub async fn detach_file(&self, file_id: FileId) -> Result<DeleteResult> {
        self.blocking(move |conn| {
            let n = conn.execute(
                "DELETE FROM project_files WHERE id = ?1",
                params![file_id.get()],
            )?;
            Ok(delete_result(n))
        })
        .await
    }
}

fn row_to_project(row: &rusqlite::Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: ProjectId(row.get("id")?),
        project_name: row.get("project_name")?,
        owner_user_id: UserId(row.get("owner_user_id")?),
    })
}

fn row_to_grant(row: &rusqlite::Row<'_>) -> rusqlite::Result<Grant> {
    Ok(Grant {
        id: GrantId(row.get("id")?),
        project_id: ProjectId(row.get("project_id")?),
        email: row.get("email")?,
    })
}

fn delete_result(rows: usize) -> DeleteResult {
    if rows == 0 {
        DeleteResult::Missing
    } else {
        DeleteResult::Deleted
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_project(&self, project: &NewProject) -> Result<ProjectId> {
        let project = project.clone();

        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO projects (project_name, owner_user_id) VALUES (?1, ?2)",
                params![project.project_name, project.owner_user_id.get()],
            )
            .map_err(|e| {
                StoreError::from_sqlite(e, format!("project name '{}'", project.project_name))
            })?;

            Ok(ProjectId(conn.last_insert_rowid()))
        })
        .await
    }

    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>> {
        self.blocking(move |conn| {
            conn.query_row(
                "SELECT id, project_name, owner_user_id FROM projects WHERE id = ?1",
                params![id.get()],
                row_to_project,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn find_projects_by_name(&self, name: &str) -> Result<Vec<Project>> {
        let name = name.to_string();

        self.blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, project_name, owner_user_id FROM projects
                 WHERE project_name = ?1 ORDER BY id",
            )?;
            let projects = stmt
                .query_map(params![name], row_to_project)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(projects)
        })
        .await
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.blocking(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, project_name, owner_user_id FROM projects ORDER BY id")?;
            let projects = stmt
                .query_map([], row_to_project)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(projects)
        })
        .await
    }

    async fn list_projects_by_owner(&self, owner: UserId) -> Result<Vec<Project>> {
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, project_name, owner_user_id FROM projects
                 WHERE owner_user_id = ?1 ORDER BY id",
            )?;
            let projects = stmt
                .query_map(params![owner.get()], row_to_project)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(projects)
        })
        .await
    }

    async fn list_projects_granted_to(&self, email: &str) -> Result<Vec<Project>> {
        let email = email.to_string();

        self.blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT p.id, p.project_name, p.owner_user_id
                 FROM projects p JOIN project_access a ON a.project_id = p.id
                 WHERE a.email = ?1 ORDER BY p.id",
            )?;
            let projects = stmt
                .query_map(params![email], row_to_project)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(projects)
        })
        .await
    }

    async fn update_project(&self, project: &Project) -> Result<bool> {
        let project = project.clone();

        self.blocking(move |conn| {
            let n = conn
                .execute(
                    "UPDATE projects SET project_name = ?1 WHERE id = ?2",
                    params![project.project_name, project.id.get()],
                )
                .map_err(|e| {
                    StoreError::from_sqlite(e, format!("project name '{}'", project.project_name))
                })?;
            Ok(n > 0)
        })
        .await
    }

    async fn delete_project(&self, id: ProjectId) -> Result<DeleteResult> {
        self.blocking(move |conn| {
            let n = conn
                .execute("DELETE FROM projects WHERE id = ?1", params![id.get()])
                .map_err(|e| StoreError::from_sqlite(e, format!("project {} has dependents", id)))?;
            Ok(delete_result(n))
        })
        .await
    }

    async fn insert_grant(&self, grant: &NewGrant) -> Result<GrantId> {
        let grant = grant.clone();

        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO project_access (project_id, email) VALUES (?1, ?2)",
                params![grant.project_id.get(), grant.email],
            )
            .map_err(|e| {
                StoreError::from_sqlite(
                    e,
                    format!("grant for '{}' on project {}", grant.email, grant.project_id),
                )
            })?;

            Ok(GrantId(conn.last_insert_rowid()))
        })
        .await
    }

    async fn get_grant(&self, id: GrantId) -> Result<Option<Grant>> {
        self.blocking(move |conn| {
            conn.query_row(
                "SELECT id, project_id, email FROM project_access WHERE id = ?1",
                params![id.get()],
                row_to_grant,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn list_grants_for_project(&self, project_id: ProjectId) -> Result<Vec<Grant>> {
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, project_id, email FROM project_access
                 WHERE project_id = ?1 ORDER BY id",
            )?;
            let grants = stmt
                .query_map(params![project_id.get()], row_to_grant)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(grants)
        })
        .await
    }

    async fn delete_grant(&self, id: GrantId) -> Result<DeleteResult> {
        self.blocking(move |conn| {
            let n = conn.execute(
                "DELETE FROM project_access WHERE id = ?1",
                params![id.get()],
            )?;
            Ok(delete_result(n))
        })
        .await
    }
}

#[async_trait]
impl UserDirectory for SqliteStore {
    async fn lookup(&self, email: &str) -> Result<Option<AuthUser>> {
        let email = normalize_email(email);

        self.blocking(move |conn| {
            let row: Option<(i64, String, String)> = conn
                .query_row(
                    "SELECT id, email, role FROM users WHERE email = ?1",
                    params![email],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )
                .optional()?;

            row.map(|(id, email, role)| -> Result<AuthUser> {
                let role =
                    Role::parse(&role).map_err(|e| StoreError::InvalidData(e.to_string()))?;
                Ok(AuthUser {
                    id: UserId(id),
                    email,
                    role,
                })
            })
            .transpose()
        })
        .await
    }
}
