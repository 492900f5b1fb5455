//! Payroll calculation and payslip issuance.
//!
//! [`calculate_net_pay`] is the pure gross-to-net rule; the engine's
//! `generate_payslip` applies it with the employee's current tax rate and
//! persists the result as an immutable [`Payslip`](crate::models::Payslip).

mod calculation;
mod payslip;

pub use calculation::{NetPayResult, calculate_net_pay};
