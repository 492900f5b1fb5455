//! Role-based authorization.
//!
//! Permissions are a single lookup keyed by (role, action, scope) so the
//! whole matrix can be enumerated and tested.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{WorkflowError, WorkflowResult};
use crate::models::{CurrentUser, EmployeeId, Role};
use crate::store::Tables;

/// Something a user may try to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Create or delete departments.
    ManageDepartments,
    /// Create an employee together with their login.
    CreateEmployeeAccount,
    /// Update, activate/deactivate, or delete employees.
    ManageEmployees,
    /// Grant or revoke fine-grained roles.
    ManageRoles,
    /// Create or delete holidays.
    ManageHolidays,
    /// Respond to or close grievances.
    ResolveGrievances,
    /// Approve or reject leave requests.
    DecideLeave,
    /// Issue a payslip.
    GeneratePayslip,
    /// Submit a leave request or grievance.
    SubmitRequest,
    /// Read leave, grievance, payslip, and balance records.
    ViewRecords,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::ManageDepartments => "manage departments",
            Action::CreateEmployeeAccount => "create employee accounts",
            Action::ManageEmployees => "manage employees",
            Action::ManageRoles => "manage roles",
            Action::ManageHolidays => "manage holidays",
            Action::ResolveGrievances => "resolve grievances",
            Action::DecideLeave => "approve or reject leave",
            Action::GeneratePayslip => "generate payslips",
            Action::SubmitRequest => "submit requests",
            Action::ViewRecords => "view records",
        };
        f.write_str(label)
    }
}

/// Whose records an action touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// The acting user's own records.
    Own,
    /// Anybody's records, or organization-wide data.
    Any,
}

/// The permission table.
///
/// Admins may do everything. Other roles may only submit requests, view
/// records, and issue payslips for themselves.
pub fn permits(role: Role, action: Action, scope: Scope) -> bool {
    match (role, action, scope) {
        (Role::Admin, _, _) => true,
        (
            Role::Employee | Role::Trainer,
            Action::SubmitRequest | Action::ViewRecords | Action::GeneratePayslip,
            Scope::Own,
        ) => true,
        _ => false,
    }
}

/// Checks an organization-wide action.
pub fn authorize(user: &CurrentUser, action: Action) -> WorkflowResult<()> {
    check(user, action, Scope::Any)
}

/// Checks an action against one employee's records.
pub fn authorize_for(user: &CurrentUser, action: Action, owner: EmployeeId) -> WorkflowResult<()> {
    let scope = if user.employee_id == owner {
        Scope::Own
    } else {
        Scope::Any
    };
    check(user, action, scope)
}

fn check(user: &CurrentUser, action: Action, scope: Scope) -> WorkflowResult<()> {
    if permits(user.role, action, scope) {
        return Ok(());
    }
    warn!(
        account_id = user.account_id,
        role = %user.role,
        action = %action,
        ?scope,
        "authorization denied"
    );
    Err(WorkflowError::Denied {
        role: user.role.to_string(),
        action: action.to_string(),
    })
}

/// Re-reads the acting account from the store.
///
/// The caller's claimed role is replaced by the stored one, and inactive
/// or unknown accounts are refused.
pub fn resolve_actor(tables: &Tables, user: &CurrentUser) -> WorkflowResult<CurrentUser> {
    match tables.accounts.get(user.account_id) {
        Some(account) if account.is_active => Ok(CurrentUser::from(account)),
        Some(account) => {
            warn!(account_id = account.id, "inactive account attempted an operation");
            Err(WorkflowError::Denied {
                role: account.role.to_string(),
                action: "act while the account is inactive".to_string(),
            })
        }
        None => Err(WorkflowError::Denied {
            role: user.role.to_string(),
            action: "act without a valid account".to_string(),
        }),
    }
}
