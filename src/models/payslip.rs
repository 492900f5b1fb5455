//! Payslip model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AccountId, EmployeeId, PayslipId};

/// A record of one salary payment. Never modified after issue.
///
/// `net_salary` always equals `gross_salary - tax_deduction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// Surrogate key.
    pub id: PayslipId,
    /// The paid employee.
    pub employee_id: EmployeeId,
    /// First day of the pay period.
    pub period_start: NaiveDate,
    /// Last day of the pay period (inclusive).
    pub period_end: NaiveDate,
    /// Pay before tax.
    pub gross_salary: Decimal,
    /// Tax withheld, rounded to cents.
    pub tax_deduction: Decimal,
    /// Pay after tax.
    pub net_salary: Decimal,
    /// The tax rate percentage applied at issue time.
    pub tax_rate: Decimal,
    /// When the payslip was generated.
    pub generated_at: DateTime<Utc>,
    /// The account that issued it.
    pub issued_by: AccountId,
}
