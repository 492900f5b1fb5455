//! Employee lifecycle: creation with a login, updates, activation, deletion.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::config::WorkflowPolicy;
use crate::engine::Engine;
use crate::error::{WorkflowError, WorkflowResult};
use crate::guard::{Action, UniqueField, authorize, authorize_for, ensure_unique, resolve_actor};
use crate::models::{
    CurrentUser, Department, DepartmentId, Employee, EmployeeId, EmployeeUpdate, NewEmployee, Role,
    UserAccount,
};
use crate::store::{CascadeSummary, Store, Tables};
use crate::workflow::require_min_chars;

use super::AccountRequest;

/// An employee together with the login created for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeWithAccount {
    /// The employee record.
    pub employee: Employee,
    /// The login.
    pub account: UserAccount,
}

impl<S: Store> Engine<S> {
    /// Creates an employee and their login as one unit.
    ///
    /// If anything about the account is rejected (for example a duplicate
    /// username) the employee is not created either.
    pub fn create_employee_with_account(
        &self,
        user: &CurrentUser,
        fields: NewEmployee,
        account: AccountRequest,
        department_id: DepartmentId,
    ) -> WorkflowResult<EmployeeWithAccount> {
        // Refuse before paying for a hash; the transaction checks again.
        self.store.read(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::CreateEmployeeAccount)
        })?;
        let password_hash = self.hash_new_password(&account)?;
        let now = self.clock.now();

        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::CreateEmployeeAccount)?;
            let created = insert_employee_with_account(
                tables,
                &self.policy,
                fields,
                &account,
                password_hash,
                department_id,
                now,
            )?;
            info!(
                employee_id = created.employee.id,
                account_id = created.account.id,
                role = %created.account.role,
                created_by = actor.account_id,
                "employee and account created"
            );
            Ok(created)
        })
    }

    /// Creates the first administrator, together with their department.
    ///
    /// Only allowed while no account exists at all.
    pub fn bootstrap_admin(
        &self,
        department_name: &str,
        fields: NewEmployee,
        username: &str,
        password: &str,
    ) -> WorkflowResult<EmployeeWithAccount> {
        let account = AccountRequest {
            username: username.to_string(),
            password: password.to_string(),
            role: Role::Admin,
        };
        self.store.read(ensure_no_accounts)?;
        let password_hash = self.hash_new_password(&account)?;
        let now = self.clock.now();
        let min_name = self.policy.text.department_name;

        self.store.transaction(|tables| {
            ensure_no_accounts(tables)?;
            require_min_chars("department name", department_name, min_name)?;
            let department_id = match tables.department_by_name(department_name) {
                Some(existing) => existing.id,
                None => {
                    tables
                        .departments
                        .insert_with(|id| Department {
                            id,
                            name: department_name.trim().to_string(),
                            description: None,
                        })
                        .id
                }
            };
            let created = insert_employee_with_account(
                tables,
                &self.policy,
                fields,
                &account,
                password_hash,
                department_id,
                now,
            )?;
            info!(
                employee_id = created.employee.id,
                account_id = created.account.id,
                "administrator bootstrapped"
            );
            Ok(created)
        })
    }

    /// Flips an employee's active flag and mirrors it onto their account.
    pub fn toggle_employee_active(
        &self,
        user: &CurrentUser,
        employee_id: EmployeeId,
    ) -> WorkflowResult<Employee> {
        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::ManageEmployees)?;

            let employee = tables
                .employees
                .get_mut(employee_id)
                .ok_or(WorkflowError::NotFound {
                    entity: "employee",
                    id: employee_id,
                })?;
            employee.is_active = !employee.is_active;
            let updated = employee.clone();

            if let Some(account) = tables.account_for_employee_mut(employee_id) {
                account.is_active = updated.is_active;
            }

            info!(
                employee_id,
                is_active = updated.is_active,
                changed_by = actor.account_id,
                "employee active flag toggled"
            );
            Ok(updated)
        })
    }

    /// Applies a partial update to an employee.
    pub fn update_employee(
        &self,
        user: &CurrentUser,
        employee_id: EmployeeId,
        changes: EmployeeUpdate,
    ) -> WorkflowResult<Employee> {
        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::ManageEmployees)?;

            if let Some(department_id) = changes.department_id {
                if tables.departments.get(department_id).is_none() {
                    return Err(WorkflowError::NotFound {
                        entity: "department",
                        id: department_id,
                    });
                }
            }
            if let Some(rate) = changes.tax_rate {
                validate_tax_rate(rate)?;
            }
            if let Some(salary) = changes.salary {
                validate_salary(salary)?;
            }
            if let Some(title) = &changes.job_title {
                require_min_chars("job_title", title, 1)?;
            }
            if let Some(contact) = &changes.contact {
                require_min_chars("email", &contact.email, 3)?;
            }

            let employee = tables
                .employees
                .get_mut(employee_id)
                .ok_or(WorkflowError::NotFound {
                    entity: "employee",
                    id: employee_id,
                })?;
            if let Some(contact) = changes.contact {
                employee.contact = contact;
            }
            if let Some(title) = changes.job_title {
                employee.job_title = title.trim().to_string();
            }
            if let Some(department_id) = changes.department_id {
                employee.department_id = department_id;
            }
            if let Some(salary) = changes.salary {
                employee.salary = salary;
            }
            if let Some(rate) = changes.tax_rate {
                employee.tax_rate = rate;
            }

            info!(employee_id, changed_by = actor.account_id, "employee updated");
            Ok(employee.clone())
        })
    }

    /// Deletes an employee along with their account, role links, leave
    /// requests, payslips, and grievances.
    pub fn delete_employee(
        &self,
        user: &CurrentUser,
        employee_id: EmployeeId,
    ) -> WorkflowResult<CascadeSummary> {
        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::ManageEmployees)?;
            if actor.employee_id == employee_id {
                return Err(WorkflowError::validation(
                    "employee_id",
                    "administrators cannot delete their own record",
                ));
            }
            let summary = tables
                .remove_employee_cascade(employee_id)
                .ok_or(WorkflowError::NotFound {
                    entity: "employee",
                    id: employee_id,
                })?;
            info!(
                employee_id,
                deleted_by = actor.account_id,
                leave_requests = summary.leave_requests,
                payslips = summary.payslips,
                grievances = summary.grievances,
                "employee deleted"
            );
            Ok(summary)
        })
    }

    /// Reads one employee record.
    pub fn employee(&self, user: &CurrentUser, employee_id: EmployeeId) -> WorkflowResult<Employee> {
        self.store.read(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize_for(&actor, Action::ViewRecords, employee_id)?;
            tables
                .employees
                .get(employee_id)
                .cloned()
                .ok_or(WorkflowError::NotFound {
                    entity: "employee",
                    id: employee_id,
                })
        })
    }

    fn hash_new_password(&self, account: &AccountRequest) -> WorkflowResult<String> {
        let limits = &self.policy.text;
        require_min_chars("username", &account.username, limits.username)?;
        if account.username.trim().chars().any(char::is_whitespace) {
            return Err(WorkflowError::validation(
                "username",
                "must not contain whitespace",
            ));
        }
        if account.password.chars().count() < limits.password {
            return Err(WorkflowError::validation(
                "password",
                format!("must be at least {} characters", limits.password),
            ));
        }
        self.hasher.hash(&account.password)
    }
}

fn ensure_no_accounts(tables: &Tables) -> WorkflowResult<()> {
    if tables.accounts.is_empty() {
        return Ok(());
    }
    Err(WorkflowError::Denied {
        role: "anonymous".to_string(),
        action: "bootstrap an administrator once accounts exist".to_string(),
    })
}

fn validate_tax_rate(rate: Decimal) -> WorkflowResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(WorkflowError::validation(
            "tax_rate",
            format!("must be between 0 and 100 (got {})", rate),
        ));
    }
    Ok(())
}

fn validate_salary(salary: Decimal) -> WorkflowResult<()> {
    if salary < Decimal::ZERO {
        return Err(WorkflowError::validation("salary", "must not be negative"));
    }
    Ok(())
}

/// Inserts the employee first, then the account and its role link. The
/// caller's transaction discards the employee if any later step fails.
fn insert_employee_with_account(
    tables: &mut Tables,
    policy: &WorkflowPolicy,
    fields: NewEmployee,
    account: &AccountRequest,
    password_hash: String,
    department_id: DepartmentId,
    now: DateTime<Utc>,
) -> WorkflowResult<EmployeeWithAccount> {
    if tables.departments.get(department_id).is_none() {
        return Err(WorkflowError::NotFound {
            entity: "department",
            id: department_id,
        });
    }
    require_min_chars("first_name", &fields.first_name, 1)?;
    require_min_chars("last_name", &fields.last_name, 1)?;
    require_min_chars("email", &fields.contact.email, 3)?;
    require_min_chars("job_title", &fields.job_title, 1)?;
    validate_salary(fields.salary)?;
    let tax_rate = fields.tax_rate.unwrap_or(policy.new_hire.tax_rate);
    validate_tax_rate(tax_rate)?;

    let employee = tables
        .employees
        .insert_with(|id| Employee {
            id,
            first_name: fields.first_name.trim().to_string(),
            last_name: fields.last_name.trim().to_string(),
            contact: fields.contact,
            job_title: fields.job_title.trim().to_string(),
            department_id,
            hire_date: fields.hire_date,
            salary: fields.salary,
            tax_rate,
            annual_leave_balance: fields
                .annual_leave_balance
                .unwrap_or(policy.new_hire.annual_leave_days),
            sick_leave_balance: fields
                .sick_leave_balance
                .unwrap_or(policy.new_hire.sick_leave_days),
            is_active: true,
        })
        .clone();

    ensure_unique(tables, UniqueField::Username, &account.username)?;
    let account = tables
        .accounts
        .insert_with(|id| UserAccount {
            id,
            username: account.username.trim().to_string(),
            password_hash,
            role: account.role,
            employee_id: employee.id,
            is_active: true,
            created_at: now,
            last_login: None,
        })
        .clone();
    tables.role_assignments.insert((account.id, account.role));

    Ok(EmployeeWithAccount { employee, account })
}
