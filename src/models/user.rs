//! Login accounts.

use serde::{Deserialize, Serialize};

/// Authorization level of a login account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, including mutations, imports and exports.
    Admin,
    /// Read access and leave submission.
    Employee,
}

/// A login account. The password is only ever held as a bcrypt hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique identifier assigned by the store.
    pub id: u64,
    /// Unique username.
    pub username: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// Authorization level.
    pub role: UserRole,
}

impl User {
    /// Returns true for administrator accounts.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
