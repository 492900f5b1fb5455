//! The full set of relations plus the predicate queries the engine needs.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use serde::Serialize;

use crate::models::{
    AccountId, Department, DepartmentId, Employee, EmployeeId, Grievance, Holiday, LeaveRequest,
    LeaveStatus, Payslip, Role, RoleAssignment, UserAccount,
};

use super::Table;

/// Every relation held by a store.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    /// Departments.
    pub departments: Table<Department>,
    /// Employees.
    pub employees: Table<Employee>,
    /// User accounts.
    pub accounts: Table<UserAccount>,
    /// Account/role join relation.
    pub role_assignments: BTreeSet<(AccountId, Role)>,
    /// Leave requests.
    pub leave_requests: Table<LeaveRequest>,
    /// Grievances.
    pub grievances: Table<Grievance>,
    /// Payslips.
    pub payslips: Table<Payslip>,
    /// Holidays.
    pub holidays: Table<Holiday>,
}

/// Row counts removed by an employee cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeSummary {
    /// User accounts removed (zero or one).
    pub accounts: usize,
    /// Role links removed.
    pub role_assignments: usize,
    /// Leave requests removed.
    pub leave_requests: usize,
    /// Payslips removed.
    pub payslips: usize,
    /// Grievances removed.
    pub grievances: usize,
}

/// Names compare equal ignoring case (Unicode-aware) and surrounding whitespace.
fn same_name(stored: &str, wanted: &str) -> bool {
    stored.trim().to_lowercase() == wanted.trim().to_lowercase()
}

impl Tables {
    /// Finds a department by name, ignoring case and surrounding whitespace.
    pub fn department_by_name(&self, name: &str) -> Option<&Department> {
        self.departments.values().find(|d| same_name(&d.name, name))
    }

    /// Employees referencing a department.
    pub fn employees_in_department(&self, department_id: DepartmentId) -> Vec<&Employee> {
        self.employees
            .values()
            .filter(|e| e.department_id == department_id)
            .collect()
    }

    /// Finds an account by username, ignoring case and surrounding whitespace.
    pub fn account_by_username(&self, username: &str) -> Option<&UserAccount> {
        self.accounts.values().find(|a| same_name(&a.username, username))
    }

    /// Finds a holiday on `date` with the same name, compared as department
    /// names are.
    pub fn holiday_named(&self, date: NaiveDate, name: &str) -> Option<&Holiday> {
        self.holidays
            .values()
            .find(|h| h.date == date && same_name(&h.name, name))
    }

    /// The account owned by an employee, if any.
    pub fn account_for_employee(&self, employee_id: EmployeeId) -> Option<&UserAccount> {
        self.accounts
            .values()
            .find(|a| a.employee_id == employee_id)
    }

    /// Mutable access to the account owned by an employee, if any.
    pub fn account_for_employee_mut(&mut self, employee_id: EmployeeId) -> Option<&mut UserAccount> {
        self.accounts
            .values_mut()
            .find(|a| a.employee_id == employee_id)
    }

    /// Role links held by an account, in role order.
    pub fn roles_of(&self, account_id: AccountId) -> Vec<RoleAssignment> {
        self.role_assignments
            .iter()
            .filter(|(holder, _)| *holder == account_id)
            .map(|&(account_id, role)| RoleAssignment { account_id, role })
            .collect()
    }

    /// Leave requests of an employee, most recent request first.
    pub fn leave_requests_for(&self, employee_id: EmployeeId) -> Vec<&LeaveRequest> {
        let mut requests: Vec<&LeaveRequest> = self
            .leave_requests
            .values()
            .filter(|r| r.employee_id == employee_id)
            .collect();
        requests.sort_by(|a, b| b.requested_at.cmp(&a.requested_at).then(b.id.cmp(&a.id)));
        requests
    }

    /// Leave requests in a given status, oldest request first, each with
    /// its employee.
    pub fn leave_requests_with_status(
        &self,
        status: LeaveStatus,
    ) -> Vec<(&LeaveRequest, &Employee)> {
        let mut requests: Vec<(&LeaveRequest, &Employee)> = self
            .leave_requests
            .values()
            .filter(|r| r.status == status)
            .filter_map(|r| self.employees.get(r.employee_id).map(|e| (r, e)))
            .collect();
        requests.sort_by(|(a, _), (b, _)| a.requested_at.cmp(&b.requested_at).then(a.id.cmp(&b.id)));
        requests
    }

    /// Grievances matching `predicate`, each with its employee, most
    /// recent first.
    pub fn grievances_with_employee(
        &self,
        mut predicate: impl FnMut(&Grievance) -> bool,
    ) -> Vec<(&Grievance, &Employee)> {
        let mut grievances: Vec<(&Grievance, &Employee)> = self
            .grievances
            .values()
            .filter(|g| predicate(g))
            .filter_map(|g| self.employees.get(g.employee_id).map(|e| (g, e)))
            .collect();
        grievances.sort_by(|(a, _), (b, _)| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
        grievances
    }

    /// Payslips of an employee, latest pay period first.
    pub fn payslips_for(&self, employee_id: EmployeeId) -> Vec<&Payslip> {
        let mut payslips: Vec<&Payslip> = self
            .payslips
            .values()
            .filter(|p| p.employee_id == employee_id)
            .collect();
        payslips.sort_by(|a, b| b.period_start.cmp(&a.period_start).then(b.id.cmp(&a.id)));
        payslips
    }

    /// Deletes an employee and everything that belongs to them.
    ///
    /// Returns `None` if the employee does not exist.
    pub fn remove_employee_cascade(&mut self, employee_id: EmployeeId) -> Option<CascadeSummary> {
        self.employees.remove(employee_id)?;

        let mut summary = CascadeSummary::default();
        let owned_accounts: Vec<AccountId> = self
            .accounts
            .values()
            .filter(|a| a.employee_id == employee_id)
            .map(|a| a.id)
            .collect();
        for account_id in owned_accounts {
            self.accounts.remove(account_id);
            summary.accounts += 1;
            let before = self.role_assignments.len();
            self.role_assignments.retain(|(holder, _)| *holder != account_id);
            summary.role_assignments += before - self.role_assignments.len();
        }
        summary.leave_requests = self
            .leave_requests
            .remove_where(|r| r.employee_id == employee_id);
        summary.payslips = self.payslips.remove_where(|p| p.employee_id == employee_id);
        summary.grievances = self
            .grievances
            .remove_where(|g| g.employee_id == employee_id);

        Some(summary)
    }
}
