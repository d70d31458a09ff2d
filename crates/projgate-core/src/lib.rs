//! # projgate Core
//!
//! Pure domain types for projgate: projects, access grants, and the
//! identities that act on them.
//!
//! This crate contains no I/O and no storage. It is plain data plus the
//! input rules every layer above agrees on.
//!
//! ## Key Types
//!
//! - [`Project`] - A named project with a single owner
//! - [`Grant`] - Permission for an email to see a project
//! - [`AuthUser`] - The calling identity, resolved outside the core
//! - [`Role`] - Closed set of roles (`Admin`, `User`)
//! - [`ProjectPatch`] - Partial update applied by a rename

pub mod error;
pub mod grant;
pub mod identity;
pub mod project;
pub mod types;
pub mod validation;

pub use error::{CoreError, Result};
pub use grant::{Grant, NewGrant};
pub use identity::{AuthUser, Role};
pub use project::{NewProject, Project, ProjectPatch};
pub use types::{FileId, GrantId, ProjectId, UserId};
pub use validation::{
    normalize_email, validate_email, validate_project_name, MAX_PROJECT_NAME_LEN,
};
