//! Clock seam for "today"/"overdue"/"upcoming" classification.
//!
//! Derivation compares calendar dates in local time, so the seam owns both
//! sides of that comparison: the current date and the conversion of a due
//! timestamp to its calendar day. Tests pin both with [`FixedClock`].

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of the current calendar date and of timestamp-to-day conversion.
pub trait Clock: Send + Sync {
    /// Today's date in the session's local time zone.
    fn today(&self) -> NaiveDate;

    /// Calendar day an instant falls on, in the same zone as [`today`].
    /// Both sides of every due-date comparison must come from one clock.
    ///
    /// [`today`]: Clock::today
    fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate;
}

/// System clock, local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&Local).date_naive()
    }
}

/// A clock pinned to a fixed date, for tests. Days are taken from the UTC
/// timestamp so fixtures stay deterministic across host time zones.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }

    fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.date_naive()
    }
}
