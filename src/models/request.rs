//! The employee-initiated request union.
//!
//! [`Request`] covers both workflow types. Each behavior is a single
//! `match` over the variant, so the per-type rules sit side by side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EmployeeId, Grievance, GrievanceStatus, LeaveRequest, LeaveStatus, LeaveType};

/// Derived urgency of a request. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Can wait.
    Low,
    /// Routine.
    Normal,
    /// Needs prompt attention.
    High,
}

/// Discriminant of a [`Request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    /// A [`LeaveRequest`].
    Leave,
    /// A [`Grievance`].
    Grievance,
}

/// A leave request or a grievance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request_type", content = "request")]
pub enum Request {
    /// Time-off request.
    Leave(LeaveRequest),
    /// Formal complaint.
    Grievance(Grievance),
}

impl Request {
    /// The type tag.
    pub fn request_type(&self) -> RequestType {
        match self {
            Request::Leave(_) => RequestType::Leave,
            Request::Grievance(_) => RequestType::Grievance,
        }
    }

    /// The employee who raised the request.
    pub fn employee_id(&self) -> EmployeeId {
        match self {
            Request::Leave(leave) => leave.employee_id,
            Request::Grievance(grievance) => grievance.employee_id,
        }
    }

    /// When the request was raised.
    pub fn requested_at(&self) -> DateTime<Utc> {
        match self {
            Request::Leave(leave) => leave.requested_at,
            Request::Grievance(grievance) => grievance.submitted_at,
        }
    }

    /// The status tag as displayed.
    pub fn status_label(&self) -> String {
        match self {
            Request::Leave(leave) => leave.status.to_string(),
            Request::Grievance(grievance) => grievance.status.to_string(),
        }
    }

    /// Whether the request can still be acted upon.
    ///
    /// For leave this means it is awaiting a decision; for a grievance it
    /// means it has not been closed.
    pub fn can_be_approved(&self) -> bool {
        match self {
            Request::Leave(leave) => leave.status == LeaveStatus::Pending,
            Request::Grievance(grievance) => matches!(
                grievance.status,
                GrievanceStatus::Open | GrievanceStatus::InProgress
            ),
        }
    }

    /// Derived urgency.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_workflow::models::{LeaveRequest, LeaveStatus, LeaveType, Priority, Request};
    /// use chrono::{NaiveDate, Utc};
    ///
    /// let leave = LeaveRequest {
    ///     id: 1,
    ///     employee_id: 1,
    ///     leave_type: LeaveType::Sick,
    ///     start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
    ///     days_requested: 1,
    ///     reason: "Flu".to_string(),
    ///     status: LeaveStatus::Pending,
    ///     requested_at: Utc::now(),
    ///     approver_id: None,
    ///     approved_at: None,
    /// };
    /// assert_eq!(Request::Leave(leave).priority_level(), Priority::High);
    /// ```
    pub fn priority_level(&self) -> Priority {
        match self {
            Request::Leave(leave) => match leave.leave_type {
                LeaveType::Sick => Priority::High,
                LeaveType::Annual => Priority::Normal,
                LeaveType::Unpaid => Priority::Low,
            },
            Request::Grievance(_) => Priority::High,
        }
    }

    /// Human-readable one-liner for display.
    pub fn summary(&self) -> String {
        match self {
            Request::Leave(leave) => leave.summary(),
            Request::Grievance(grievance) => grievance.summary(),
        }
    }
}

impl From<LeaveRequest> for Request {
    fn from(leave: LeaveRequest) -> Self {
        Request::Leave(leave)
    }
}

impl From<Grievance> for Request {
    fn from(grievance: Grievance) -> Self {
        Request::Grievance(grievance)
    }
}
