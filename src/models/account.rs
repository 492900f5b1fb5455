//! User accounts, roles, and the acting-user identity.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, EmployeeId};

/// The closed set of roles a user account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full administrative rights.
    Admin,
    /// Regular staff member.
    Employee,
    /// Staff member who runs training sessions.
    Trainer,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Employee, Role::Trainer];

    /// Returns the role's name as stored and displayed.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Employee => "Employee",
            Role::Trainer => "Trainer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown role: {}", s))
    }
}

/// A login belonging to exactly one employee.
///
/// The password is only ever held as a salted hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Surrogate key.
    pub id: AccountId,
    /// Login name, unique ignoring case.
    pub username: String,
    /// PHC-format salted password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Coarse role used for quick authorization checks.
    pub role: Role,
    /// The employee this account belongs to.
    pub employee_id: EmployeeId,
    /// Mirrors the owning employee's active flag.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account last authenticated successfully.
    pub last_login: Option<DateTime<Utc>>,
}

/// A row in the account/role join relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// The account holding the role.
    pub account_id: AccountId,
    /// The granted role.
    pub role: Role,
}

/// The identity of whoever is invoking an operation.
///
/// Supplied by the caller on every call; the engine never keeps a global
/// notion of the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// The acting account.
    pub account_id: AccountId,
    /// The employee behind the account.
    pub employee_id: EmployeeId,
    /// The account's coarse role.
    pub role: Role,
}

impl From<&UserAccount> for CurrentUser {
    fn from(account: &UserAccount) -> Self {
        CurrentUser {
            account_id: account.id,
            employee_id: account.employee_id,
            role: account.role,
        }
    }
}
