//! Configuration types for the workflow policy.
//!
//! This module contains the strongly-typed structures deserialized from
//! `policy.yaml`. Every section falls back to its defaults when omitted.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Leave request limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LeavePolicy {
    /// Longest leave a single request may cover, in days.
    pub max_days_per_request: u32,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            max_days_per_request: 30,
        }
    }
}

/// Minimum lengths for free-text input, in characters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TextLimits {
    /// Grievance title.
    pub grievance_title: usize,
    /// Grievance description.
    pub grievance_description: usize,
    /// Administrator response to a grievance.
    pub grievance_response: usize,
    /// Department name.
    pub department_name: usize,
    /// Account username.
    pub username: usize,
    /// Account password.
    pub password: usize,
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            grievance_title: 5,
            grievance_description: 20,
            grievance_response: 10,
            department_name: 2,
            username: 3,
            password: 6,
        }
    }
}

/// Starting values for newly created employees.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewHireDefaults {
    /// Initial annual leave days.
    pub annual_leave_days: u32,
    /// Initial sick leave days.
    pub sick_leave_days: u32,
    /// Tax rate percentage used when none is supplied.
    pub tax_rate: Decimal,
}

impl Default for NewHireDefaults {
    fn default() -> Self {
        Self {
            annual_leave_days: 20,
            sick_leave_days: 10,
            tax_rate: Decimal::new(20, 0),
        }
    }
}

/// The complete workflow policy loaded from `policy.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkflowPolicy {
    /// Leave request limits.
    pub leave: LeavePolicy,
    /// Free-text minimum lengths.
    pub text: TextLimits,
    /// Defaults for new employees.
    pub new_hire: NewHireDefaults,
}
