//! Grievance model and its state machine.
//!
//! Grievances start [`GrievanceStatus::Open`], move to
//! [`GrievanceStatus::InProgress`] when an administrator responds, and end
//! [`GrievanceStatus::Closed`].

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, EmployeeId, GrievanceId};

/// Category of a grievance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrievanceType {
    /// Harassment or bullying.
    Harassment,
    /// Discrimination on any protected ground.
    Discrimination,
    /// Health, safety, or physical working conditions.
    WorkingConditions,
    /// Pay, benefits, or deductions.
    Compensation,
    /// Conduct of a manager or supervisor.
    Management,
    /// Anything else.
    Other,
}

impl fmt::Display for GrievanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GrievanceType::Harassment => "Harassment",
            GrievanceType::Discrimination => "Discrimination",
            GrievanceType::WorkingConditions => "Working Conditions",
            GrievanceType::Compensation => "Compensation",
            GrievanceType::Management => "Management",
            GrievanceType::Other => "Other",
        };
        f.write_str(label)
    }
}

/// Status of a grievance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrievanceStatus {
    /// Filed, not yet handled.
    Open,
    /// An administrator has responded.
    InProgress,
    /// Resolved; no further changes.
    Closed,
}

impl GrievanceStatus {
    /// Returns true if the graph allows moving from `self` to `next`.
    ///
    /// `InProgress -> InProgress` is allowed so that a handler can respond
    /// more than once.
    pub fn can_transition_to(self, next: GrievanceStatus) -> bool {
        use GrievanceStatus::*;
        matches!(
            (self, next),
            (Open, InProgress) | (InProgress, InProgress) | (Open, Closed) | (InProgress, Closed)
        )
    }

    /// Returns true while the grievance still needs attention.
    pub fn is_actionable(self) -> bool {
        matches!(self, GrievanceStatus::Open | GrievanceStatus::InProgress)
    }
}

impl fmt::Display for GrievanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GrievanceStatus::Open => "Open",
            GrievanceStatus::InProgress => "In Progress",
            GrievanceStatus::Closed => "Closed",
        };
        f.write_str(label)
    }
}

/// A formal complaint raised by an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grievance {
    /// Surrogate key.
    pub id: GrievanceId,
    /// The employee who raised it.
    pub employee_id: EmployeeId,
    /// Category.
    pub grievance_type: GrievanceType,
    /// Short title.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Dates the incident(s) happened, sorted ascending.
    pub incident_dates: Vec<NaiveDate>,
    /// Current status.
    pub status: GrievanceStatus,
    /// When the grievance was filed.
    pub submitted_at: DateTime<Utc>,
    /// Latest administrator response.
    pub admin_response: Option<String>,
    /// Account that last handled the grievance.
    pub handler_id: Option<AccountId>,
    /// When the grievance was closed.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Grievance {
    /// Display line, e.g. `"Harassment grievance: Rude remarks - Open"`.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} grievance: {} - {}",
            self.grievance_type, self.title, self.status
        );
        if let Some(first) = self.incident_dates.first() {
            line.push_str(&format!(" (incident {})", first));
            if self.incident_dates.len() > 1 {
                line.push_str(&format!(" +{} more", self.incident_dates.len() - 1));
            }
        }
        line
    }
}
