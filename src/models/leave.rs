//! Leave request model and its state machine.
//!
//! A leave request starts out [`LeaveStatus::Pending`] and moves exactly
//! once, to either [`LeaveStatus::Approved`] or [`LeaveStatus::Rejected`].

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, EmployeeId, LeaveRequestId};

/// The kind of leave being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveType {
    /// Paid annual leave, drawn from the annual balance.
    Annual,
    /// Paid sick leave, drawn from the sick balance.
    Sick,
    /// Unpaid leave; draws from no balance.
    Unpaid,
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LeaveType::Annual => "Annual Leave",
            LeaveType::Sick => "Sick Leave",
            LeaveType::Unpaid => "Unpaid Leave",
        };
        f.write_str(label)
    }
}

/// Status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved; balance has been drawn down.
    Approved,
    /// Rejected; no balance change.
    Rejected,
}

impl LeaveStatus {
    /// Returns true if the graph allows moving from `self` to `next`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_workflow::models::LeaveStatus;
    ///
    /// assert!(LeaveStatus::Pending.can_transition_to(LeaveStatus::Approved));
    /// assert!(!LeaveStatus::Approved.can_transition_to(LeaveStatus::Rejected));
    /// ```
    pub fn can_transition_to(self, next: LeaveStatus) -> bool {
        matches!(
            (self, next),
            (LeaveStatus::Pending, LeaveStatus::Approved)
                | (LeaveStatus::Pending, LeaveStatus::Rejected)
        )
    }

    /// Returns true once no further transition is possible.
    pub fn is_terminal(self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Counts the days from `start` to `end`, both inclusive.
///
/// Returns zero or a negative count when `end` precedes `start`.
///
/// # Examples
///
/// ```
/// use hr_workflow::models::inclusive_days;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
/// assert_eq!(inclusive_days(start, end), 3);
/// ```
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// An employee's request for time off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Surrogate key.
    pub id: LeaveRequestId,
    /// The requesting employee.
    pub employee_id: EmployeeId,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Inclusive day count, fixed at submission.
    pub days_requested: u32,
    /// Why the leave is requested.
    pub reason: String,
    /// Current status.
    pub status: LeaveStatus,
    /// When the request was submitted.
    pub requested_at: DateTime<Utc>,
    /// Account that decided the request.
    pub approver_id: Option<AccountId>,
    /// When the request was decided.
    pub approved_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    /// Checks the day-count and date-order constraints shared by submission
    /// and approval.
    pub fn dates_are_consistent(&self, max_days: u32) -> bool {
        self.end_date >= self.start_date
            && self.days_requested > 0
            && self.days_requested <= max_days
            && i64::from(self.days_requested) == inclusive_days(self.start_date, self.end_date)
    }

    /// Display line, e.g. `"Annual Leave: 2024-01-10 to 2024-01-12 (3 days) - Pending"`.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} to {} ({} day{}) - {}",
            self.leave_type,
            self.start_date,
            self.end_date,
            self.days_requested,
            if self.days_requested == 1 { "" } else { "s" },
            self.status
        )
    }
}
