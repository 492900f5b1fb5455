//! Leave request submission and decisions.

use tracing::info;

use crate::engine::Engine;
use crate::error::{WorkflowError, WorkflowResult};
use crate::guard::{Action, authorize, authorize_for, resolve_actor};
use crate::models::{
    CurrentUser, EmployeeId, LeaveRequest, LeaveRequestId, LeaveStatus, LeaveType, inclusive_days,
};
use crate::store::{Store, Tables};

use super::{LeaveSubmission, required, require_min_chars};

impl<S: Store> Engine<S> {
    /// Files a leave request on behalf of `employee_id`.
    ///
    /// The day count is inclusive of both ends, must be between 1 and the
    /// configured maximum, and neither date may be in the past.
    pub fn submit_leave(
        &self,
        user: &CurrentUser,
        employee_id: EmployeeId,
        submission: LeaveSubmission,
    ) -> WorkflowResult<LeaveRequest> {
        let today = self.clock.today();
        let now = self.clock.now();
        let max_days = self.policy.leave.max_days_per_request;

        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize_for(&actor, Action::SubmitRequest, employee_id)?;

            let employee = tables.employees.get(employee_id).ok_or(WorkflowError::NotFound {
                entity: "employee",
                id: employee_id,
            })?;
            if !employee.is_active {
                return Err(WorkflowError::validation(
                    "employee_id",
                    "inactive employees cannot request leave",
                ));
            }

            let leave_type = required("leave_type", submission.leave_type)?;
            let start_date = required("start_date", submission.start_date)?;
            let end_date = required("end_date", submission.end_date)?;
            if end_date < start_date {
                return Err(WorkflowError::validation(
                    "end_date",
                    "must not be before the start date",
                ));
            }
            if start_date < today {
                return Err(WorkflowError::validation(
                    "start_date",
                    format!("must not be before today ({})", today),
                ));
            }
            require_min_chars("reason", &submission.reason, 1)?;

            let days = inclusive_days(start_date, end_date);
            if days > i64::from(max_days) {
                return Err(WorkflowError::validation(
                    "end_date",
                    format!("leave may cover at most {} days (got {})", max_days, days),
                ));
            }
            let days_requested = u32::try_from(days)
                .map_err(|_| WorkflowError::validation("end_date", "day count out of range"))?;

            let request = tables
                .leave_requests
                .insert_with(|id| LeaveRequest {
                    id,
                    employee_id,
                    leave_type,
                    start_date,
                    end_date,
                    days_requested,
                    reason: submission.reason.trim().to_string(),
                    status: LeaveStatus::Pending,
                    requested_at: now,
                    approver_id: None,
                    approved_at: None,
                })
                .clone();

            info!(
                request_id = request.id,
                employee_id,
                leave_type = %request.leave_type,
                days_requested,
                "leave request submitted"
            );
            Ok(request)
        })
    }

    /// Approves a pending leave request and draws down the matching balance.
    ///
    /// The status change and the balance change commit together. Approval
    /// is refused if it would take the balance below zero.
    pub fn approve_leave(
        &self,
        user: &CurrentUser,
        request_id: LeaveRequestId,
    ) -> WorkflowResult<LeaveRequest> {
        self.decide_leave(user, request_id, LeaveStatus::Approved)
    }

    /// Rejects a pending leave request. Balances are untouched.
    pub fn reject_leave(
        &self,
        user: &CurrentUser,
        request_id: LeaveRequestId,
    ) -> WorkflowResult<LeaveRequest> {
        self.decide_leave(user, request_id, LeaveStatus::Rejected)
    }

    fn decide_leave(
        &self,
        user: &CurrentUser,
        request_id: LeaveRequestId,
        decision: LeaveStatus,
    ) -> WorkflowResult<LeaveRequest> {
        let now = self.clock.now();
        let max_days = self.policy.leave.max_days_per_request;

        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::DecideLeave)?;

            let request = tables
                .leave_requests
                .get(request_id)
                .ok_or(WorkflowError::NotFound {
                    entity: "leave request",
                    id: request_id,
                })?
                .clone();

            if !request.status.can_transition_to(decision) {
                return Err(WorkflowError::InvalidState {
                    entity: "leave request",
                    id: request_id,
                    status: request.status.to_string(),
                    action: if decision == LeaveStatus::Approved {
                        "approve"
                    } else {
                        "reject"
                    },
                });
            }

            if decision == LeaveStatus::Approved {
                if !request.dates_are_consistent(max_days) {
                    return Err(WorkflowError::validation(
                        "days_requested",
                        format!(
                            "request covers {} to {} ({} days), outside the allowed 1 to {}",
                            request.start_date, request.end_date, request.days_requested, max_days
                        ),
                    ));
                }
                draw_down_balance(tables, &request)?;
            }

            let decided = tables
                .leave_requests
                .get_mut(request_id)
                .ok_or(WorkflowError::NotFound {
                    entity: "leave request",
                    id: request_id,
                })?;
            decided.status = decision;
            decided.approver_id = Some(actor.account_id);
            decided.approved_at = Some(now);

            info!(
                request_id,
                employee_id = decided.employee_id,
                approver_id = actor.account_id,
                status = %decided.status,
                "leave request decided"
            );
            Ok(decided.clone())
        })
    }
}

fn draw_down_balance(tables: &mut Tables, request: &LeaveRequest) -> WorkflowResult<()> {
    let employee = tables
        .employees
        .get_mut(request.employee_id)
        .ok_or(WorkflowError::NotFound {
            entity: "employee",
            id: request.employee_id,
        })?;

    let (balance, field) = match request.leave_type {
        LeaveType::Annual => (&mut employee.annual_leave_balance, "annual_leave_balance"),
        LeaveType::Sick => (&mut employee.sick_leave_balance, "sick_leave_balance"),
        LeaveType::Unpaid => return Ok(()),
    };

    let available = *balance;
    *balance = available
        .checked_sub(request.days_requested)
        .ok_or_else(|| {
            WorkflowError::validation(
                field,
                format!(
                    "insufficient balance: {} day(s) requested, {} available",
                    request.days_requested, available
                ),
            )
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, date};

    fn annual(start: (i32, u32, u32), end: (i32, u32, u32)) -> LeaveSubmission {
        LeaveSubmission {
            leave_type: Some(LeaveType::Annual),
            start_date: Some(date(start.0, start.1, start.2)),
            end_date: Some(date(end.0, end.1, end.2)),
            reason: "Holiday".to_string(),
        }
    }

    #[test]
    fn test_days_requested_is_inclusive() {
        let fx = Fixture::new();
        let request = fx
            .engine
            .submit_leave(&fx.staff, fx.staff.employee_id, annual((2024, 1, 10), (2024, 1, 12)))
            .unwrap();
        assert_eq!(request.days_requested, 3);
        assert_eq!(request.status, LeaveStatus::Pending);
        assert_eq!(request.approver_id, None);
    }

    #[test]
    fn test_submit_validates_fields() {
        let fx = Fixture::new();
        let own = fx.staff.employee_id;

        let mut missing_type = annual((2024, 1, 10), (2024, 1, 12));
        missing_type.leave_type = None;
        let mut missing_end = annual((2024, 1, 10), (2024, 1, 12));
        missing_end.end_date = None;
        let mut blank_reason = annual((2024, 1, 10), (2024, 1, 12));
        blank_reason.reason = "   ".to_string();

        for (submission, field) in [
            (missing_type, "leave_type"),
            (missing_end, "end_date"),
            (annual((2024, 1, 12), (2024, 1, 10)), "end_date"),
            (annual((2024, 1, 5), (2024, 1, 9)), "start_date"),
            (annual((2024, 1, 10), (2024, 2, 9)), "end_date"),
            (blank_reason, "reason"),
        ] {
            match fx.engine.submit_leave(&fx.staff, own, submission) {
                Err(WorkflowError::Validation { field: got, .. }) => assert_eq!(got, field),
                other => panic!("Expected validation error on {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_thirty_days_is_the_limit() {
        let fx = Fixture::new();
        let request = fx
            .engine
            .submit_leave(&fx.staff, fx.staff.employee_id, annual((2024, 1, 10), (2024, 2, 8)))
            .unwrap();
        assert_eq!(request.days_requested, 30);
    }

    #[test]
    fn test_cannot_submit_for_someone_else() {
        let fx = Fixture::new();
        let result = fx.engine.submit_leave(
            &fx.staff,
            fx.admin.employee_id,
            annual((2024, 1, 10), (2024, 1, 12)),
        );
        assert!(matches!(result, Err(WorkflowError::Denied { .. })));
    }

    #[test]
    fn test_approve_draws_down_matching_balance() {
        let fx = Fixture::new();
        let own = fx.staff.employee_id;
        let before = fx.employee(own);

        let request = fx
            .engine
            .submit_leave(&fx.staff, own, annual((2024, 1, 10), (2024, 1, 12)))
            .unwrap();
        let approved = fx.engine.approve_leave(&fx.admin, request.id).unwrap();

        assert_eq!(approved.status, LeaveStatus::Approved);
        assert_eq!(approved.approver_id, Some(fx.admin.account_id));
        assert!(approved.approved_at.is_some());

        let after = fx.employee(own);
        assert_eq!(after.annual_leave_balance, before.annual_leave_balance - 3);
        assert_eq!(after.sick_leave_balance, before.sick_leave_balance);
    }

    #[test]
    fn test_sick_leave_draws_sick_balance_and_unpaid_draws_none() {
        let fx = Fixture::new();
        let own = fx.staff.employee_id;
        let before = fx.employee(own);

        let mut sick = annual((2024, 1, 9), (2024, 1, 10));
        sick.leave_type = Some(LeaveType::Sick);
        let mut unpaid = annual((2024, 2, 1), (2024, 2, 5));
        unpaid.leave_type = Some(LeaveType::Unpaid);

        let sick = fx.engine.submit_leave(&fx.staff, own, sick).unwrap();
        let unpaid = fx.engine.submit_leave(&fx.staff, own, unpaid).unwrap();
        fx.engine.approve_leave(&fx.admin, sick.id).unwrap();
        fx.engine.approve_leave(&fx.admin, unpaid.id).unwrap();

        let after = fx.employee(own);
        assert_eq!(after.sick_leave_balance, before.sick_leave_balance - 2);
        assert_eq!(after.annual_leave_balance, before.annual_leave_balance);
    }

    #[test]
    fn test_reject_leaves_balance_alone() {
        let fx = Fixture::new();
        let own = fx.staff.employee_id;
        let before = fx.employee(own);

        let request = fx
            .engine
            .submit_leave(&fx.staff, own, annual((2024, 1, 10), (2024, 1, 12)))
            .unwrap();
        let rejected = fx.engine.reject_leave(&fx.admin, request.id).unwrap();

        assert_eq!(rejected.status, LeaveStatus::Rejected);
        assert_eq!(rejected.approver_id, Some(fx.admin.account_id));
        assert_eq!(fx.employee(own), before);
    }

    #[test]
    fn test_decided_request_cannot_be_decided_again() {
        let fx = Fixture::new();
        let own = fx.staff.employee_id;
        let request = fx
            .engine
            .submit_leave(&fx.staff, own, annual((2024, 1, 10), (2024, 1, 12)))
            .unwrap();
        let approved = fx.engine.approve_leave(&fx.admin, request.id).unwrap();
        let balance = fx.employee(own).annual_leave_balance;

        for result in [
            fx.engine.approve_leave(&fx.admin, request.id),
            fx.engine.reject_leave(&fx.admin, request.id),
        ] {
            assert!(matches!(result, Err(WorkflowError::InvalidState { .. })));
        }

        assert_eq!(fx.employee(own).annual_leave_balance, balance);
        let stored = fx.leave_request(request.id);
        assert_eq!(stored, approved);
    }

    #[test]
    fn test_approval_that_would_overdraw_is_refused() {
        let fx = Fixture::with_balances(2, 10);
        let own = fx.staff.employee_id;
        let request = fx
            .engine
            .submit_leave(&fx.staff, own, annual((2024, 1, 10), (2024, 1, 12)))
            .unwrap();

        let result = fx.engine.approve_leave(&fx.admin, request.id);
        assert!(matches!(
            result,
            Err(WorkflowError::Validation { ref field, .. }) if field == "annual_leave_balance"
        ));
        assert_eq!(fx.employee(own).annual_leave_balance, 2);
        assert_eq!(fx.leave_request(request.id).status, LeaveStatus::Pending);
    }

    #[test]
    fn test_only_admin_may_decide() {
        let fx = Fixture::new();
        let request = fx
            .engine
            .submit_leave(&fx.staff, fx.staff.employee_id, annual((2024, 1, 10), (2024, 1, 12)))
            .unwrap();
        assert!(matches!(
            fx.engine.approve_leave(&fx.staff, request.id),
            Err(WorkflowError::Denied { .. })
        ));
        assert_eq!(fx.leave_request(request.id).status, LeaveStatus::Pending);
    }

    #[test]
    fn test_unknown_request_is_not_found() {
        let fx = Fixture::new();
        assert!(matches!(
            fx.engine.approve_leave(&fx.admin, 404),
            Err(WorkflowError::NotFound { entity: "leave request", id: 404 })
        ));
    }

    #[test]
    fn test_racing_approvals_draw_down_once() {
        let fx = Fixture::new();
        let own = fx.staff.employee_id;
        let before = fx.employee(own).annual_leave_balance;
        let request = fx
            .engine
            .submit_leave(&fx.staff, own, annual((2024, 1, 10), (2024, 1, 12)))
            .unwrap();

        let results: Vec<WorkflowResult<LeaveRequest>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| fx.engine.approve_leave(&fx.admin, request.id)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .filter(|r| r.is_err())
                .all(|r| matches!(r, Err(WorkflowError::InvalidState { .. })))
        );
        assert_eq!(fx.employee(own).annual_leave_balance, before - 3);
    }
}
