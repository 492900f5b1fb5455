//! Core data models for the HR workflow engine.
//!
//! This module contains every persisted entity plus the derived
//! [`Request`] view over leave requests and grievances.

mod account;
mod employee;
mod grievance;
mod holiday;
mod leave;
mod payslip;
mod request;

pub use account::{CurrentUser, Role, RoleAssignment, UserAccount};
pub use employee::{ContactInfo, Department, Employee, EmployeeUpdate, NewEmployee};
pub use grievance::{Grievance, GrievanceStatus, GrievanceType};
pub use holiday::{Holiday, HolidayType};
pub use leave::{LeaveRequest, LeaveStatus, LeaveType, inclusive_days};
pub use payslip::Payslip;
pub use request::{Priority, Request, RequestType};

/// Surrogate key of an [`Employee`].
pub type EmployeeId = i64;
/// Surrogate key of a [`Department`].
pub type DepartmentId = i64;
/// Surrogate key of a [`UserAccount`].
pub type AccountId = i64;
/// Surrogate key of a [`LeaveRequest`].
pub type LeaveRequestId = i64;
/// Surrogate key of a [`Grievance`].
pub type GrievanceId = i64;
/// Surrogate key of a [`Payslip`].
pub type PayslipId = i64;
/// Surrogate key of a [`Holiday`].
pub type HolidayId = i64;
