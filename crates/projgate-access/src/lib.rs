//! # projgate Access
//!
//! The authorization rules for projects, kept apart from storage so they
//! can be reasoned about (and tested) as pure functions.
//!
//! ## Rules
//!
//! - **Mutation** ([`require_access`]): admins always pass; otherwise only the
//!   owner does. This is the single place ownership is compared.
//! - **Retrieval** ([`require_visibility`]): admins, the owner, and any email
//!   holding a grant on the project.
//! - **Listing** ([`VisibilitySet`]): admins see everything; everyone else sees
//!   owned projects plus granted projects, each project once.
//!
//! ## Usage
//!
//! ```rust
//! use projgate_access::require_access;
//! use projgate_core::{AuthUser, Project, ProjectId, Role, UserId};
//!
//! let owner = AuthUser::new(UserId(1), "u1@example.com", Role::User);
//! let project = Project {
//!     id: ProjectId(1),
//!     project_name: "Alpha".into(),
//!     owner_user_id: UserId(1),
//! };
//! assert!(require_access(&owner, Some(&project)).is_ok());
//! ```

pub mod check;
pub mod error;
pub mod visibility;

pub use check::{can_view, require_access, require_visibility};
pub use error::{AccessError, Result};
pub use visibility::VisibilitySet;
