//! Payslip issuance and lookup.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::engine::Engine;
use crate::error::{WorkflowError, WorkflowResult};
use crate::guard::{Action, authorize_for, resolve_actor};
use crate::models::{CurrentUser, EmployeeId, Payslip};
use crate::store::Store;

use super::calculate_net_pay;

impl<S: Store> Engine<S> {
    /// Issues a payslip for one pay period.
    ///
    /// Tax is computed from the employee's tax rate as it stands now. The
    /// payslip cannot be changed afterwards, and periods of one employee's
    /// payslips may not overlap.
    pub fn generate_payslip(
        &self,
        user: &CurrentUser,
        employee_id: EmployeeId,
        period_start: NaiveDate,
        period_end: NaiveDate,
        gross_salary: Decimal,
    ) -> WorkflowResult<Payslip> {
        let now = self.clock.now();

        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize_for(&actor, Action::GeneratePayslip, employee_id)?;

            if period_end < period_start {
                return Err(WorkflowError::validation(
                    "period_end",
                    "must not be before the period start",
                ));
            }
            let employee = tables.employees.get(employee_id).ok_or(WorkflowError::NotFound {
                entity: "employee",
                id: employee_id,
            })?;
            let pay = calculate_net_pay(gross_salary, employee.tax_rate)?;

            let overlapping = tables
                .payslips_for(employee_id)
                .into_iter()
                .find(|p| p.period_start <= period_end && period_start <= p.period_end)
                .map(|p| (p.period_start, p.period_end));
            if let Some((start, end)) = overlapping {
                return Err(WorkflowError::Duplicate {
                    field: "pay period",
                    value: format!("{} to {}", start, end),
                });
            }

            let payslip = tables
                .payslips
                .insert_with(|id| Payslip {
                    id,
                    employee_id,
                    period_start,
                    period_end,
                    gross_salary: pay.gross_salary,
                    tax_deduction: pay.tax_deduction,
                    net_salary: pay.net_salary,
                    tax_rate: pay.tax_rate,
                    generated_at: now,
                    issued_by: actor.account_id,
                })
                .clone();

            info!(
                payslip_id = payslip.id,
                employee_id,
                gross = %payslip.gross_salary,
                tax = %payslip.tax_deduction,
                net = %payslip.net_salary,
                issued_by = actor.account_id,
                "payslip generated"
            );
            Ok(payslip)
        })
    }

    /// Payslips of one employee, latest period first.
    pub fn payslips_for(
        &self,
        user: &CurrentUser,
        employee_id: EmployeeId,
    ) -> WorkflowResult<Vec<Payslip>> {
        self.store.read(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize_for(&actor, Action::ViewRecords, employee_id)?;
            if tables.employees.get(employee_id).is_none() {
                return Err(WorkflowError::NotFound {
                    entity: "employee",
                    id: employee_id,
                });
            }
            Ok(tables
                .payslips_for(employee_id)
                .into_iter()
                .cloned()
                .collect())
        })
    }
}
