//! Gross-to-net pay calculation.
//!
//! Tax is a flat percentage of gross pay, rounded half away from zero to
//! whole cents. Net pay is whatever remains, so the three figures always
//! reconcile exactly.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{WorkflowError, WorkflowResult};

/// The outcome of a gross-to-net calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetPayResult {
    /// Pay before tax.
    pub gross_salary: Decimal,
    /// Tax rate percentage applied.
    pub tax_rate: Decimal,
    /// Tax withheld, in whole cents.
    pub tax_deduction: Decimal,
    /// Pay after tax.
    pub net_salary: Decimal,
}

/// Computes tax and net pay for `gross_salary` at `tax_rate` percent.
///
/// # Errors
///
/// Returns a validation error if the gross amount is not positive or too
/// large to multiply by the rate, or the rate is outside 0 to 100.
///
/// # Examples
///
/// ```
/// use hr_workflow::payroll::calculate_net_pay;
/// use rust_decimal::Decimal;
///
/// let result = calculate_net_pay(Decimal::new(80000, 0), Decimal::new(30, 0)).unwrap();
/// assert_eq!(result.tax_deduction, Decimal::new(2400000, 2));
/// assert_eq!(result.net_salary, Decimal::new(5600000, 2));
/// ```
pub fn calculate_net_pay(gross_salary: Decimal, tax_rate: Decimal) -> WorkflowResult<NetPayResult> {
    if gross_salary <= Decimal::ZERO {
        return Err(WorkflowError::validation(
            "gross_salary",
            format!("must be greater than zero (got {})", gross_salary),
        ));
    }
    if tax_rate < Decimal::ZERO || tax_rate > Decimal::ONE_HUNDRED {
        return Err(WorkflowError::validation(
            "tax_rate",
            format!("must be between 0 and 100 (got {})", tax_rate),
        ));
    }

    let mut tax_deduction = gross_salary
        .checked_mul(tax_rate)
        .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(|| {
            WorkflowError::validation(
                "gross_salary",
                format!("is too large to calculate tax on (got {})", gross_salary),
            )
        })?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // Always report cents, so 24000 reads as 24000.00.
    tax_deduction.rescale(2);
    let net_salary = gross_salary - tax_deduction;

    Ok(NetPayResult {
        gross_salary,
        tax_rate,
        tax_deduction,
        net_salary,
    })
}
