//! Uniqueness and referential-integrity checks.

use tracing::warn;

use crate::error::{WorkflowError, WorkflowResult};
use crate::models::DepartmentId;
use crate::store::Tables;

/// A globally unique, case-insensitive field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    /// `UserAccount::username`.
    Username,
    /// `Department::name`.
    DepartmentName,
}

impl UniqueField {
    fn label(self) -> &'static str {
        match self {
            UniqueField::Username => "username",
            UniqueField::DepartmentName => "department name",
        }
    }
}

/// Fails with [`WorkflowError::Duplicate`] if `value` is already taken.
pub fn ensure_unique(tables: &Tables, field: UniqueField, value: &str) -> WorkflowResult<()> {
    let taken = match field {
        UniqueField::Username => tables.account_by_username(value).is_some(),
        UniqueField::DepartmentName => tables.department_by_name(value).is_some(),
    };
    if taken {
        warn!(field = field.label(), value, "duplicate value rejected");
        return Err(WorkflowError::Duplicate {
            field: field.label(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Fails if the department does not exist or still has employees.
pub fn ensure_deletable(tables: &Tables, department_id: DepartmentId) -> WorkflowResult<()> {
    if tables.departments.get(department_id).is_none() {
        return Err(WorkflowError::NotFound {
            entity: "department",
            id: department_id,
        });
    }
    let dependents = tables.employees_in_department(department_id).len();
    if dependents > 0 {
        warn!(department_id, dependents, "department still has employees");
        return Err(WorkflowError::HasDependents {
            entity: "department",
            id: department_id,
            dependents,
        });
    }
    Ok(())
}
