//! Time source for the engine.
//!
//! Submission rules compare dates against "today", so the engine reads
//! time through [`Clock`] rather than calling `Utc::now()` directly.

use chrono::{DateTime, NaiveDate, Utc};

/// Provides the current instant.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The current date (UTC).
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// A clock frozen at midday UTC on `date`.
    pub fn on(date: NaiveDate) -> Self {
        let noon = date
            .and_hms_opt(12, 0, 0)
            .unwrap_or_default()
            .and_utc();
        FixedClock(noon)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_reports_its_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let clock = FixedClock::on(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now(), clock.now());
    }
}
