//! Application state for the WorkFlowX API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::auth::{Credentials, Session, SessionRegistry, hash_password};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::UserRole;
use crate::store::InMemoryStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration, the entity store and the live sessions. Writers
/// take the store's write lock, so concurrent marks for the same employee
/// and day are applied one after the other.
#[derive(Clone)]
pub struct AppState {
    /// The loaded configuration.
    config: Arc<ConfigLoader>,
    store: Arc<RwLock<InMemoryStore>>,
    sessions: Arc<RwLock<SessionRegistry>>,
}

impl AppState {
    /// Creates the state with a store seeded from the configured
    /// departments and roles.
    pub fn new(config: ConfigLoader) -> EngineResult<Self> {
        let store = InMemoryStore::from_config(config.config())?;
        Ok(Self::with_store(config, store))
    }

    /// Creates the state around an existing store.
    pub fn with_store(config: ConfigLoader, store: InMemoryStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(RwLock::new(store)),
            sessions: Arc::new(RwLock::new(SessionRegistry::new())),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// The entity store.
    pub fn store(&self) -> &RwLock<InMemoryStore> {
        &self.store
    }

    /// The live sessions.
    pub fn sessions(&self) -> &RwLock<SessionRegistry> {
        &self.sessions
    }

    /// Registers an account whose password is already hashed.
    pub async fn add_user(
        &self,
        username: &str,
        password_hash: String,
        role: UserRole,
    ) -> EngineResult<u64> {
        let mut store = self.store.write().await;
        Ok(store.add_user(username, password_hash, role)?.id)
    }

    /// Hashes `password` at the configured cost and registers an account.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> EngineResult<u64> {
        if self.store.read().await.user_by_username(username.trim()).is_some() {
            return Err(EngineError::DuplicateUsername {
                username: username.trim().to_string(),
            });
        }

        let cost = self.config.password_hash_cost();
        let password = password.to_string();
        let hash = on_blocking_pool(move || hash_password(&password, cost)).await?;

        let id = self.add_user(username, hash, role).await?;
        info!(user_id = id, username = %username.trim(), role = ?role, "User account created");
        Ok(id)
    }

    /// Hashes `password` at the configured cost and registers an admin.
    pub async fn bootstrap_admin(&self, username: &str, password: &str) -> EngineResult<u64> {
        self.create_user(username, password, UserRole::Admin).await
    }

    /// Checks a username and password and opens a session.
    ///
    /// The store lock is only held while the account is copied out and the
    /// session lock only while the token is inserted. The bcrypt check in
    /// between runs on the blocking pool with no lock held.
    pub async fn login(&self, username: &str, password: &str) -> EngineResult<Session> {
        let credentials = {
            let store = self.store.read().await;
            Credentials::lookup(&store, username)?
        };

        let password = password.to_string();
        let credentials = on_blocking_pool(move || {
            credentials.check(&password)?;
            Ok(credentials)
        })
        .await?;

        Ok(self.sessions.write().await.open(&credentials))
    }
}

/// Runs bcrypt work off the async worker threads.
async fn on_blocking_pool<T, F>(work: F) -> EngineResult<T>
where
    F: FnOnce() -> EngineResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| EngineError::PasswordHash {
            message: e.to_string(),
        })?
}
