//! Test fixtures and helpers.

use std::sync::Arc;

use projgate::{Engine, EngineConfig};
use projgate_core::{AuthUser, Role};
use projgate_store::MemoryStore;

/// Engine type used by fixtures.
pub type FixtureEngine = Engine<Arc<MemoryStore>, Arc<MemoryStore>>;

/// An engine over a fresh in-memory store that doubles as the user directory.
pub struct TestFixture {
    pub store: Arc<MemoryStore>,
    pub engine: FixtureEngine,
}

impl TestFixture {
    /// Create a fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            engine: Engine::new(store.clone(), store.clone(), config),
            store,
        }
    }

    /// Register an account with the given role.
    ///
    /// Panics if the email is already registered.
    pub async fn register(&self, email: &str, role: Role) -> AuthUser {
        self.store
            .register_user(email, role)
            .await
            .unwrap_or_else(|e| panic!("register {}: {}", email, e))
    }

    /// Register a plain user.
    pub async fn user(&self, email: &str) -> AuthUser {
        self.register(email, Role::User).await
    }

    /// Register an admin.
    pub async fn admin(&self, email: &str) -> AuthUser {
        self.register(email, Role::Admin).await
    }

    /// Register `count` plain users named `user{i}@example.com`.
    pub async fn users(&self, count: usize) -> Vec<AuthUser> {
        let mut users = Vec::with_capacity(count);
        for i in 0..count {
            users.push(self.user(&format!("user{}@example.com", i)).await);
        }
        users
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
