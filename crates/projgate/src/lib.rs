//! # projgate
//!
//! The access control engine for shared projects.
//!
//! ## Overview
//!
//! Users own projects and may share them with other users by email. Admins
//! see and manage everything. The engine enforces:
//!
//! - **Ownership**: only the owner (or an admin) may rename or delete a project
//! - **Visibility**: a user sees owned projects plus projects granted to their
//!   email, each project once
//! - **Uniqueness**: project names are unique; one grant per email per project
//! - **No orphans**: a project with grants or files cannot be deleted
//!
//! Storage constraint violations are translated into the same typed failures
//! the pre-checks produce, so callers see one contract whether or not they
//! raced another request.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use projgate::{Engine, EngineConfig};
//! use projgate::core::Role;
//! use projgate::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("projgate.db").unwrap();
//!     let owner = store.register_user("u1@example.com", Role::User).await.unwrap();
//!     store.register_user("u2@example.com", Role::User).await.unwrap();
//!
//!     let engine = Engine::new(store.clone(), store, EngineConfig::default());
//!
//!     let project = engine.create_project("Alpha", &owner).await.unwrap();
//!     let grant = engine.grant_access(project, "u2@example.com").await.unwrap();
//!
//!     engine.revoke_access(grant).await.unwrap();
//!     engine.delete_project(project, &owner).await.unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `projgate::core` - Domain types (Project, Grant, AuthUser, Role)
//! - `projgate::store` - Storage traits, SQLite and in-memory stores
//! - `projgate::access` - Authorization predicates and visibility sets

pub mod config;
pub mod engine;
pub mod error;

pub use projgate_access as access;
pub use projgate_core as core;
pub use projgate_store as store;

pub use config::EngineConfig;
pub use engine::{Engine, DELETE_BLOCKED_MESSAGE};
pub use error::{EngineError, Result};

pub use projgate_core::{
    AuthUser, Grant, GrantId, Project, ProjectId, ProjectPatch, Role, UserId,
};
