//! # projgate Store
//!
//! Storage abstraction for projgate. Provides a trait-based interface for
//! project and grant persistence with SQLite and in-memory implementations.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for project and grant storage
//! - [`UserDirectory`] - The async trait for resolving user accounts by email
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`DeleteResult`] - Outcome of a delete-by-id
//!
//! ## Usage
//!
//! ```rust,no_run
//! use projgate_core::{NewProject, UserId};
//! use projgate_store::{SqliteStore, Store};
//!
//! async fn example() {
//!     let store = SqliteStore::open("projgate.db").unwrap();
//!     let id = store
//!         .insert_project(&NewProject::new("Alpha", UserId(1)))
//!         .await
//!         .unwrap();
//!     let project = store.get_project(id).await.unwrap();
//!     assert!(project.is_some());
//! }
//! ```
//!
//! ## Constraints
//!
//! Both stores enforce the same rules at write time, atomically:
//!
//! - **Unique project names**: a second insert with the same name fails with
//!   [`StoreError::UniqueViolation`].
//! - **One grant per (project, email)**: likewise `UniqueViolation`.
//! - **No orphans**: deleting a project that still has grants or files fails
//!   with [`StoreError::ForeignKeyViolation`] and leaves the project in place.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{DeleteResult, Store, UserDirectory};
