//! Holiday calendar maintenance.

use chrono::NaiveDate;
use tracing::info;

use crate::engine::Engine;
use crate::error::{WorkflowError, WorkflowResult};
use crate::guard::{Action, authorize, resolve_actor};
use crate::models::{CurrentUser, Holiday, HolidayId, HolidayType};
use crate::store::Store;
use crate::workflow::require_min_chars;

impl<S: Store> Engine<S> {
    /// Adds a holiday to the calendar.
    pub fn create_holiday(
        &self,
        user: &CurrentUser,
        name: &str,
        date: NaiveDate,
        holiday_type: HolidayType,
        is_recurring: bool,
    ) -> WorkflowResult<Holiday> {
        let now = self.clock.now();

        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::ManageHolidays)?;
            require_min_chars("name", name, 1)?;

            let name = name.trim();
            if tables.holiday_named(date, name).is_some() {
                return Err(WorkflowError::Duplicate {
                    field: "holiday",
                    value: format!("{} on {}", name, date),
                });
            }

            let holiday = tables
                .holidays
                .insert_with(|id| Holiday {
                    id,
                    name: name.to_string(),
                    date,
                    holiday_type,
                    is_recurring,
                    created_by: actor.account_id,
                    created_at: now,
                })
                .clone();
            info!(holiday_id = holiday.id, %date, is_recurring, "holiday created");
            Ok(holiday)
        })
    }

    /// Removes a holiday from the calendar.
    pub fn delete_holiday(&self, user: &CurrentUser, holiday_id: HolidayId) -> WorkflowResult<()> {
        self.store.transaction(|tables| {
            let actor = resolve_actor(tables, user)?;
            authorize(&actor, Action::ManageHolidays)?;
            tables
                .holidays
                .remove(holiday_id)
                .ok_or(WorkflowError::NotFound {
                    entity: "holiday",
                    id: holiday_id,
                })?;
            info!(holiday_id, "holiday deleted");
            Ok(())
        })
    }

    /// Holidays falling in `year`, in date order. Recurring holidays are
    /// reported with their date in that year.
    pub fn holidays_in_year(&self, year: i32) -> WorkflowResult<Vec<Holiday>> {
        self.store.read(|tables| {
            let mut holidays: Vec<Holiday> = tables
                .holidays
                .values()
                .filter_map(|h| {
                    h.occurrence_in(year).map(|date| Holiday {
                        date,
                        ..h.clone()
                    })
                })
                .collect();
            holidays.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
            Ok(holidays)
        })
    }
}
