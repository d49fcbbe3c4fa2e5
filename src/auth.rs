//! Authentication and route guards.
//!
//! Passwords are stored as bcrypt hashes. A successful login issues a random
//! UUID v4 session token which clients send back as
//! `Authorization: Bearer <token>`. Handlers call [`require_login`] or
//! [`require_admin`] before touching the store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::UserRole;
use crate::store::InMemoryStore;

const BEARER_PREFIX: &str = "Bearer ";

/// Hashes `plain` with bcrypt at the given cost.
pub fn hash_password(plain: &str, cost: u32) -> EngineResult<String> {
    Ok(bcrypt::hash(plain, cost)?)
}

/// Checks `plain` against a stored bcrypt hash.
///
/// # Errors
///
/// Returns [`EngineError::PasswordHash`] when the stored hash is malformed.
pub fn verify_password(plain: &str, hash: &str) -> EngineResult<bool> {
    Ok(bcrypt::verify(plain, hash)?)
}

/// A logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Opaque bearer token.
    pub token: String,
    /// The account that logged in.
    pub user_id: u64,
    /// Username at login time.
    pub username: String,
    /// Authorization level.
    pub role: UserRole,
    /// When the session was issued.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Returns true for administrator sessions.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// A login account copied out of the store.
///
/// Owning the hash lets the bcrypt check run after the store lock is
/// released.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// The account id.
    pub user_id: u64,
    /// The stored username.
    pub username: String,
    /// Authorization level.
    pub role: UserRole,
    password_hash: String,
}

impl Credentials {
    /// Copies the account named `username` (trimmed) out of `store`.
    ///
    /// Unknown usernames fail with [`EngineError::InvalidCredentials`].
    pub fn lookup(store: &InMemoryStore, username: &str) -> EngineResult<Self> {
        let user = store
            .user_by_username(username.trim())
            .ok_or(EngineError::InvalidCredentials)?;
        Ok(Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
            password_hash: user.password_hash.clone(),
        })
    }

    /// Checks `password` against the stored hash. This is the slow part of
    /// a login.
    pub fn check(&self, password: &str) -> EngineResult<()> {
        if !verify_password(password, &self.password_hash)? {
            return Err(EngineError::InvalidCredentials);
        }
        Ok(())
    }
}

/// Live sessions keyed by token.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Session>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for credentials that have already been checked.
    pub fn open(&mut self, credentials: &Credentials) -> Session {
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id: credentials.user_id,
            username: credentials.username.clone(),
            role: credentials.role,
            created_at: Utc::now(),
        };
        self.sessions.insert(session.token.clone(), session.clone());
        session
    }

    /// Closes a session. Returns false if the token was unknown.
    pub fn logout(&mut self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Looks up a live session.
    pub fn session(&self, token: &str) -> EngineResult<&Session> {
        self.sessions.get(token).ok_or(EngineError::Unauthenticated)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true when no session is open.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(authorization: Option<&str>) -> EngineResult<&str> {
    authorization
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(EngineError::Unauthenticated)
}

/// Any logged-in user.
pub fn require_login(
    sessions: &SessionRegistry,
    authorization: Option<&str>,
) -> EngineResult<Session> {
    let token = bearer_token(authorization)?;
    sessions.session(token).cloned()
}

/// A logged-in administrator.
pub fn require_admin(
    sessions: &SessionRegistry,
    authorization: Option<&str>,
) -> EngineResult<Session> {
    let session = require_login(sessions, authorization)?;
    if !session.is_admin() {
        return Err(EngineError::Forbidden);
    }
    Ok(session)
}
