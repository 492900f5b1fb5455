//! Employee, department, account, and holiday management.
//!
//! These operations maintain the reference data the workflows run against.
//! All of them are Admin-only apart from [`Engine::authenticate`] and the
//! one-time [`Engine::bootstrap_admin`].
//!
//! [`Engine::authenticate`]: crate::engine::Engine::authenticate
//! [`Engine::bootstrap_admin`]: crate::engine::Engine::bootstrap_admin

mod account;
mod department;
mod employee;
mod holiday;

use serde::Deserialize;

use crate::models::Role;

pub use employee::EmployeeWithAccount;

/// Login details for a new account.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AccountRequest {
    /// Desired username.
    pub username: String,
    /// Plaintext password; hashed before anything is stored.
    pub password: String,
    /// Coarse role.
    pub role: Role,
}

impl std::fmt::Debug for AccountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}
