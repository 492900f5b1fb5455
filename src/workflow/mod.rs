//! Request workflow engine.
//!
//! This module drives the leave-request and grievance state machines,
//! including the leave-balance side effects of approval, and exposes the
//! read-side queries over both request types.

mod grievance;
mod leave;
mod queries;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{WorkflowError, WorkflowResult};
use crate::models::{GrievanceType, LeaveType};

pub use queries::{GrievanceRecord, LeaveBalance, PendingLeave};

/// What an employee fills in to request leave.
///
/// Fields are optional so that an unselected type or a missing date is
/// reported as a validation error rather than a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveSubmission {
    /// The kind of leave.
    #[serde(default)]
    pub leave_type: Option<LeaveType>,
    /// First day of leave.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day of leave (inclusive).
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Why the leave is needed.
    #[serde(default)]
    pub reason: String,
}

/// What an employee fills in to raise a grievance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrievanceSubmission {
    /// Category.
    #[serde(default)]
    pub grievance_type: Option<GrievanceType>,
    /// Short title.
    #[serde(default)]
    pub title: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// When the incident(s) happened.
    #[serde(default)]
    pub incident_dates: Vec<NaiveDate>,
}

/// Fails unless `value`, trimmed, is at least `min` characters long.
pub(crate) fn require_min_chars(field: &str, value: &str, min: usize) -> WorkflowResult<()> {
    let len = value.trim().chars().count();
    if len < min {
        return Err(WorkflowError::validation(
            field,
            format!("must be at least {} characters (got {})", min, len),
        ));
    }
    Ok(())
}

/// Unwraps a required form field.
pub(crate) fn required<T>(field: &str, value: Option<T>) -> WorkflowResult<T> {
    value.ok_or_else(|| WorkflowError::validation(field, "is required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_chars_counts_trimmed_characters() {
        assert!(require_min_chars("title", "  abcd  ", 5).is_err());
        assert!(require_min_chars("title", "abcde", 5).is_ok());
        assert!(require_min_chars("title", "ééééé", 5).is_ok());
    }

    #[test]
    fn test_required_reports_field() {
        match required::<u32>("leave_type", None) {
            Err(WorkflowError::Validation { field, .. }) => assert_eq!(field, "leave_type"),
            other => panic!("Expected validation error, got {:?}", other),
        }
        assert_eq!(required("x", Some(3)).unwrap(), 3);
    }
}
