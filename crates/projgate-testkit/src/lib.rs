//! # projgate Testkit
//!
//! Testing utilities for projgate.
//!
//! - **Fixtures**: an engine over a fresh in-memory store, with helpers to
//!   register actors
//! - **Generators**: proptest strategies for names, emails, and roles
//!
//! ```rust
//! use projgate_testkit::TestFixture;
//!
//! # async fn example() {
//! let fixture = TestFixture::new();
//! let owner = fixture.user("u1@example.com").await;
//! let project = fixture.engine.create_project("Alpha", &owner).await.unwrap();
//! # }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{FixtureEngine, TestFixture};
