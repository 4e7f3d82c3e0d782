//! Time source for the engine.
//!
//! Completion timestamps are instants (`DateTime<Utc>`); rollover compares
//! calendar days in the user's local time zone. Both come through [`Clock`]
//! so tests can pin "now".

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Abstraction over the current time.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day in local time.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
