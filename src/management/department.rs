//! Department creation and deletion.

use tracing::info;

use crate::engine::Engine;
use crate::error::{WorkflowError, WorkflowResult};
use crate::guard::{Action, UniqueField, authorize, ensure_deletable, ensure_unique, resolve_actor};
use crate::models::{CurrentUser, Department, DepartmentId};
use crate::store::Store;
use crate::workflow::require_min_chars;

impl<S: Store> Engine<S> {
    /// Creates a department. Names are unique ignoring case.
    pub fn create_department(
        &self,
        user: &CurrentUser,
        name: &str,
        description: Option<String>,
    ) -> WorkflowResult<Department> {
        let min_len = self.policy.text.department_name;

        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::ManageDepartments)?;
            require_min_chars("name", name, min_len)?;
            ensure_unique(tables, UniqueField::DepartmentName, name)?;

            let department = tables
                .departments
                .insert_with(|id| Department {
                    id,
                    name: name.trim().to_string(),
                    description: description
                        .map(|d| d.trim().to_string())
                        .filter(|d| !d.is_empty()),
                })
                .clone();
            info!(department_id = department.id, name = %department.name, "department created");
            Ok(department)
        })
    }

    /// Deletes a department that no employee references.
    pub fn delete_department(
        &self,
        user: &CurrentUser,
        department_id: DepartmentId,
    ) -> WorkflowResult<Department> {
        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::ManageDepartments)?;
            ensure_deletable(tables, department_id)?;

            let removed = tables
                .departments
                .remove(department_id)
                .ok_or(WorkflowError::NotFound {
                    entity: "department",
                    id: department_id,
                })?;
            info!(department_id, name = %removed.name, "department deleted");
            Ok(removed)
        })
    }

    /// All departments, by id.
    pub fn departments(&self) -> WorkflowResult<Vec<Department>> {
        self.store
            .read(|tables| Ok(tables.departments.values().cloned().collect()))
    }
}
