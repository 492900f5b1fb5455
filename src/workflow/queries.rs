//! Read-side queries over leave requests and grievances.

use serde::Serialize;

use crate::engine::Engine;
use crate::error::{WorkflowError, WorkflowResult};
use crate::guard::{Action, authorize, authorize_for, resolve_actor};
use crate::models::{
    CurrentUser, Employee, EmployeeId, Grievance, GrievanceStatus, LeaveRequest, LeaveStatus,
    Request,
};
use crate::store::{Store, Tables};

/// A pending leave request with the requester's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingLeave {
    /// The request.
    pub request: LeaveRequest,
    /// The requester's full name.
    pub employee_name: String,
}

/// A grievance loaded together with its employee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrievanceRecord {
    /// The grievance.
    pub grievance: Grievance,
    /// The employee who raised it.
    pub employee: Employee,
}

/// An employee's remaining leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeaveBalance {
    /// The employee.
    pub employee_id: EmployeeId,
    /// Remaining annual leave days.
    pub annual: u32,
    /// Remaining sick leave days.
    pub sick: u32,
}

fn existing_employee(tables: &Tables, employee_id: EmployeeId) -> WorkflowResult<&Employee> {
    tables.employees.get(employee_id).ok_or(WorkflowError::NotFound {
        entity: "employee",
        id: employee_id,
    })
}

impl<S: Store> Engine<S> {
    /// Leave requests of one employee, most recent first.
    pub fn leave_requests_for(
        &self,
        user: &CurrentUser,
        employee_id: EmployeeId,
    ) -> WorkflowResult<Vec<LeaveRequest>> {
        self.store.read(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize_for(&actor, Action::ViewRecords, employee_id)?;
            existing_employee(tables, employee_id)?;
            Ok(tables
                .leave_requests_for(employee_id)
                .into_iter()
                .cloned()
                .collect())
        })
    }

    /// Every pending leave request, oldest first.
    pub fn pending_leave_requests(&self, user: &CurrentUser) -> WorkflowResult<Vec<PendingLeave>> {
        self.store.read(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::DecideLeave)?;
            Ok(tables
                .leave_requests_with_status(LeaveStatus::Pending)
                .into_iter()
                .map(|(request, employee)| PendingLeave {
                    request: request.clone(),
                    employee_name: employee.full_name(),
                })
                .collect())
        })
    }

    /// Grievances raised by one employee, most recent first.
    pub fn grievances_for(
        &self,
        user: &CurrentUser,
        employee_id: EmployeeId,
    ) -> WorkflowResult<Vec<GrievanceRecord>> {
        self.store.read(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize_for(&actor, Action::ViewRecords, employee_id)?;
            existing_employee(tables, employee_id)?;
            Ok(records(tables.grievances_with_employee(|g| {
                g.employee_id == employee_id
            })))
        })
    }

    /// Grievances still needing attention: `Open` ones first, then
    /// `InProgress`, each oldest first.
    pub fn open_grievances(&self, user: &CurrentUser) -> WorkflowResult<Vec<GrievanceRecord>> {
        self.store.read(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::ResolveGrievances)?;
            let mut open = records(tables.grievances_with_employee(|g| g.status.is_actionable()));
            open.sort_by_key(|r| {
                (
                    r.grievance.status != GrievanceStatus::Open,
                    r.grievance.submitted_at,
                    r.grievance.id,
                )
            });
            Ok(open)
        })
    }

    /// Both kinds of request for one employee, highest priority first and
    /// then most recent first.
    pub fn requests_for(
        &self,
        user: &CurrentUser,
        employee_id: EmployeeId,
    ) -> WorkflowResult<Vec<Request>> {
        self.store.read(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize_for(&actor, Action::ViewRecords, employee_id)?;
            existing_employee(tables, employee_id)?;

            let mut requests: Vec<Request> = tables
                .leave_requests_for(employee_id)
                .into_iter()
                .cloned()
                .map(Request::from)
                .chain(
                    tables
                        .grievances_with_employee(|g| g.employee_id == employee_id)
                        .into_iter()
                        .map(|(g, _)| Request::from(g.clone())),
                )
                .collect();
            requests.sort_by(|a, b| {
                b.priority_level()
                    .cmp(&a.priority_level())
                    .then(b.requested_at().cmp(&a.requested_at()))
            });
            Ok(requests)
        })
    }

    /// Remaining leave for one employee.
    pub fn leave_balance(
        &self,
        user: &CurrentUser,
        employee_id: EmployeeId,
    ) -> WorkflowResult<LeaveBalance> {
        self.store.read(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize_for(&actor, Action::ViewRecords, employee_id)?;
            let employee = existing_employee(tables, employee_id)?;
            Ok(LeaveBalance {
                employee_id,
                annual: employee.annual_leave_balance,
                sick: employee.sick_leave_balance,
            })
        })
    }
}

fn records(rows: Vec<(&Grievance, &Employee)>) -> Vec<GrievanceRecord> {
    rows.into_iter()
        .map(|(grievance, employee)| GrievanceRecord {
            grievance: grievance.clone(),
            employee: employee.clone(),
        })
        .collect()
}
