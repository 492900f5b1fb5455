//! Holiday calendar model.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, HolidayId};

/// Where a holiday comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HolidayType {
    /// Gazetted public holiday.
    Public,
    /// Organization-specific day off.
    Company,
}

/// A non-working day on the organization calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Surrogate key.
    pub id: HolidayId,
    /// Name (e.g. "New Year's Day").
    pub name: String,
    /// The date of the first occurrence.
    pub date: NaiveDate,
    /// Public or company holiday.
    pub holiday_type: HolidayType,
    /// Whether the holiday repeats every year on the same month and day.
    pub is_recurring: bool,
    /// The account that created it.
    pub created_by: AccountId,
    /// When it was created.
    pub created_at: DateTime<Utc>,
}

impl Holiday {
    /// Returns the date this holiday falls on in `year`, if any.
    ///
    /// Recurring holidays are projected onto the year (29 February falls
    /// back to 28 February in common years). Non-recurring holidays only
    /// occur in the year of their date. Recurring holidays never occur
    /// before their first date.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_workflow::models::{Holiday, HolidayType};
    /// use chrono::{NaiveDate, Utc};
    ///
    /// let holiday = Holiday {
    ///     id: 1,
    ///     name: "New Year's Day".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    ///     holiday_type: HolidayType::Public,
    ///     is_recurring: true,
    ///     created_by: 1,
    ///     created_at: Utc::now(),
    /// };
    /// assert_eq!(holiday.occurrence_in(2026), NaiveDate::from_ymd_opt(2026, 1, 1));
    /// assert_eq!(holiday.occurrence_in(2023), None);
    /// ```
    pub fn occurrence_in(&self, year: i32) -> Option<NaiveDate> {
        if !self.is_recurring {
            return (self.date.year() == year).then_some(self.date);
        }
        if year < self.date.year() {
            return None;
        }
        NaiveDate::from_ymd_opt(year, self.date.month(), self.date.day())
            .or_else(|| NaiveDate::from_ymd_opt(year, self.date.month(), 28))
    }
}
