//! Grievance submission, response, and closure.

use tracing::info;

use crate::engine::Engine;
use crate::error::{WorkflowError, WorkflowResult};
use crate::guard::{Action, authorize, authorize_for, resolve_actor};
use crate::models::{CurrentUser, EmployeeId, Grievance, GrievanceId, GrievanceStatus};
use crate::store::{Store, Tables};

use super::{GrievanceSubmission, require_min_chars, required};

impl<S: Store> Engine<S> {
    /// Raises a grievance on behalf of `employee_id`.
    pub fn submit_grievance(
        &self,
        user: &CurrentUser,
        employee_id: EmployeeId,
        submission: GrievanceSubmission,
    ) -> WorkflowResult<Grievance> {
        let today = self.clock.today();
        let now = self.clock.now();
        let limits = &self.policy.text;

        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize_for(&actor, Action::SubmitRequest, employee_id)?;
            if tables.employees.get(employee_id).is_none() {
                return Err(WorkflowError::NotFound {
                    entity: "employee",
                    id: employee_id,
                });
            }

            let grievance_type = required("grievance_type", submission.grievance_type)?;
            require_min_chars("title", &submission.title, limits.grievance_title)?;
            require_min_chars(
                "description",
                &submission.description,
                limits.grievance_description,
            )?;

            let mut incident_dates = submission.incident_dates;
            incident_dates.sort();
            incident_dates.dedup();
            match incident_dates.last() {
                None => {
                    return Err(WorkflowError::validation(
                        "incident_dates",
                        "at least one incident date is required",
                    ));
                }
                Some(latest) if *latest > today => {
                    return Err(WorkflowError::validation(
                        "incident_dates",
                        format!("{} is in the future", latest),
                    ));
                }
                Some(_) => {}
            }

            let grievance = tables
                .grievances
                .insert_with(|id| Grievance {
                    id,
                    employee_id,
                    grievance_type,
                    title: submission.title.trim().to_string(),
                    description: submission.description.trim().to_string(),
                    incident_dates,
                    status: GrievanceStatus::Open,
                    submitted_at: now,
                    admin_response: None,
                    handler_id: None,
                    resolved_at: None,
                })
                .clone();

            info!(
                grievance_id = grievance.id,
                employee_id,
                grievance_type = %grievance.grievance_type,
                "grievance submitted"
            );
            Ok(grievance)
        })
    }

    /// Records an administrator response, moving the grievance to
    /// `InProgress`. Responding again overwrites the previous response.
    pub fn respond_to_grievance(
        &self,
        user: &CurrentUser,
        grievance_id: GrievanceId,
        response_text: &str,
    ) -> WorkflowResult<Grievance> {
        let min_len = self.policy.text.grievance_response;

        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::ResolveGrievances)?;
            require_min_chars("response", response_text, min_len)?;
            let grievance = advance(tables, grievance_id, GrievanceStatus::InProgress, "respond to")?;

            grievance.admin_response = Some(response_text.trim().to_string());
            grievance.handler_id = Some(actor.account_id);

            info!(
                grievance_id,
                handler_id = actor.account_id,
                "grievance response recorded"
            );
            Ok(grievance.clone())
        })
    }

    /// Closes a grievance from `Open` or `InProgress`.
    pub fn close_grievance(
        &self,
        user: &CurrentUser,
        grievance_id: GrievanceId,
    ) -> WorkflowResult<Grievance> {
        let now = self.clock.now();

        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::ResolveGrievances)?;
            let grievance = advance(tables, grievance_id, GrievanceStatus::Closed, "close")?;

            grievance.handler_id = Some(actor.account_id);
            grievance.resolved_at = Some(now);

            info!(grievance_id, handler_id = actor.account_id, "grievance closed");
            Ok(grievance.clone())
        })
    }
}

/// Moves a grievance to `next` if the transition graph allows it.
fn advance<'t>(
    tables: &'t mut Tables,
    grievance_id: GrievanceId,
    next: GrievanceStatus,
    action: &'static str,
) -> WorkflowResult<&'t mut Grievance> {
    let grievance = tables
        .grievances
        .get_mut(grievance_id)
        .ok_or(WorkflowError::NotFound {
            entity: "grievance",
            id: grievance_id,
        })?;
    if !grievance.status.can_transition_to(next) {
        return Err(WorkflowError::InvalidState {
            entity: "grievance",
            id: grievance_id,
            status: grievance.status.to_string(),
            action,
        });
    }
    grievance.status = next;
    Ok(grievance)
}
