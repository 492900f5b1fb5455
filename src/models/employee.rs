//! Employee and department models.
//!
//! This module defines the [`Employee`] and [`Department`] records along
//! with the input types used to create and update employees.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DepartmentId, EmployeeId};

/// How to reach an employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Work email address.
    pub email: String,
    /// Phone number, free-form.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address, free-form.
    #[serde(default)]
    pub address: Option<String>,
}

/// An organizational unit employees belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Surrogate key.
    pub id: DepartmentId,
    /// Department name, unique ignoring case.
    pub name: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A person employed by the organization.
///
/// Leave balances are counted in whole days and are only ever changed by
/// leave approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Surrogate key.
    pub id: EmployeeId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Contact details.
    pub contact: ContactInfo,
    /// Job title (e.g. "Payroll Officer").
    pub job_title: String,
    /// The department the employee belongs to.
    pub department_id: DepartmentId,
    /// The date the employee was hired.
    pub hire_date: NaiveDate,
    /// Annual salary.
    pub salary: Decimal,
    /// Income tax rate as a percentage (e.g. 30 for 30%).
    pub tax_rate: Decimal,
    /// Remaining annual leave days.
    pub annual_leave_balance: u32,
    /// Remaining sick leave days.
    pub sick_leave_balance: u32,
    /// Whether the employee is currently active.
    pub is_active: bool,
}

impl Employee {
    /// Returns the employee's display name.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_workflow::models::{ContactInfo, Employee};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: 1,
    ///     first_name: "Ada".to_string(),
    ///     last_name: "Lovelace".to_string(),
    ///     contact: ContactInfo::default(),
    ///     job_title: "Analyst".to_string(),
    ///     department_id: 1,
    ///     hire_date: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
    ///     salary: Decimal::new(80000, 0),
    ///     tax_rate: Decimal::new(30, 0),
    ///     annual_leave_balance: 20,
    ///     sick_leave_balance: 10,
    ///     is_active: true,
    /// };
    /// assert_eq!(employee.full_name(), "Ada Lovelace");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The fields a caller supplies to create an employee.
///
/// Leave balances start from the configured defaults unless overridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Contact details.
    pub contact: ContactInfo,
    /// Job title.
    pub job_title: String,
    /// The date the employee was hired.
    pub hire_date: NaiveDate,
    /// Annual salary.
    pub salary: Decimal,
    /// Tax rate percentage; the configured default applies when absent.
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    /// Initial annual leave days.
    #[serde(default)]
    pub annual_leave_balance: Option<u32>,
    /// Initial sick leave days.
    #[serde(default)]
    pub sick_leave_balance: Option<u32>,
}

/// A partial update to an existing employee. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    /// New contact details.
    #[serde(default)]
    pub contact: Option<ContactInfo>,
    /// New job title.
    #[serde(default)]
    pub job_title: Option<String>,
    /// New department.
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
    /// New salary.
    #[serde(default)]
    pub salary: Option<Decimal>,
    /// New tax rate percentage.
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
}
