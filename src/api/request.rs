//! Request bodies for the HR workflow API.
//!
//! Leave and grievance submissions reuse the engine's own submission types;
//! the bodies here cover the remaining endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::management::AccountRequest;
use crate::models::{DepartmentId, HolidayType, NewEmployee, Role};

/// Body of `POST /login`.
#[derive(Deserialize)]
pub struct LoginRequest {
    /// Username, matched ignoring case.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Body of `POST /departments`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDepartmentRequest {
    /// Department name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `POST /employees`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployeeRequest {
    /// Employee fields.
    pub employee: NewEmployee,
    /// Login to create alongside.
    pub account: AccountRequest,
    /// Department the employee joins.
    pub department_id: DepartmentId,
}

/// Body of `POST /accounts/:id/roles`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RoleRequest {
    /// Role to grant.
    pub role: Role,
}

/// Body of `POST /holidays`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHolidayRequest {
    /// Holiday name.
    pub name: String,
    /// Date of the (first) occurrence.
    pub date: NaiveDate,
    /// Public or company holiday.
    pub holiday_type: HolidayType,
    /// Repeats every year on the same day.
    #[serde(default)]
    pub is_recurring: bool,
}

/// Query string of `GET /holidays`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HolidayQuery {
    /// Calendar year to list.
    pub year: i32,
}

/// Body of `POST /grievances/:id/respond`.
#[derive(Debug, Clone, Deserialize)]
pub struct GrievanceResponseRequest {
    /// The administrator's response text.
    pub response: String,
}

/// Body of `POST /employees/:id/payslips`.
#[derive(Debug, Clone, Deserialize)]
pub struct PayslipRequest {
    /// First day of the pay period.
    pub period_start: NaiveDate,
    /// Last day of the pay period (inclusive).
    pub period_end: NaiveDate,
    /// Gross pay for the period.
    pub gross_salary: Decimal,
}
