//! Daily maintenance pass over scheduled tasks.
//!
//! For every task, compared by calendar day against `today`:
//!
//! 1. Completed and at least `retention_days` old: expunged.
//! 2. Open and in the past: pushed forward one day, `rollover_count += 1`.
//! 3. Open with `rollover_count >= escalation_threshold`: moved to the same
//!    day next month, count reset to 0.
//! 4. Anything else is kept as is.
//!
//! Steps 2-3 repeat until the task is no longer in the past. A task that is
//! several days overdue therefore moves forward by more than one day in a
//! single pass, landing exactly where daily passes would have put it.
//! Running the pass again on the same day is a no-op.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info};

use super::model::ScheduledTask;
use crate::config::TrackerConfig;

/// Thresholds for the maintenance pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloverPolicy {
    /// Days after which a completed task is expunged
    pub retention_days: u32,
    /// Rollovers after which a task jumps to next month
    pub escalation_threshold: u32,
}

impl Default for RolloverPolicy {
    fn default() -> Self {
        Self::from(&TrackerConfig::default())
    }
}

impl From<&TrackerConfig> for RolloverPolicy {
    fn from(config: &TrackerConfig) -> Self {
        Self {
            retention_days: config.retention_days,
            escalation_threshold: config.escalation_threshold,
        }
    }
}

/// What the pass did to a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Left exactly as it was
    Unchanged,
    /// Date moved forward
    Moved { days_rolled: u32, escalations: u32 },
    /// Completed long enough ago to be dropped
    Expired,
}

/// Totals for one maintenance pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RolloverReport {
    /// Tasks kept without change
    pub unchanged: usize,
    /// Tasks rolled forward at least one day
    pub rolled: usize,
    /// Tasks pushed into a later month
    pub escalated: usize,
    /// Completed tasks dropped
    pub expired: usize,
}

impl RolloverReport {
    /// Whether the pass changed anything.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.rolled > 0 || self.escalated > 0 || self.expired > 0
    }

    fn record(&mut self, disposition: Disposition) {
        match disposition {
            Disposition::Unchanged => self.unchanged += 1,
            Disposition::Expired => self.expired += 1,
            Disposition::Moved {
                days_rolled,
                escalations,
            } => {
                if days_rolled > 0 {
                    self.rolled += 1;
                }
                if escalations > 0 {
                    self.escalated += 1;
                }
            }
        }
    }
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|d| d.day())
}

/// Same day and time one month later.
///
/// December wraps into January of the next year. Days past the end of the
/// target month clamp to its last day (Jan 31 becomes Feb 28 or 29).
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use levelup::tasks::rollover::next_month;
///
/// let jan31 = NaiveDate::from_ymd_opt(2027, 1, 31).unwrap().and_hms_opt(8, 0, 0).unwrap();
/// let next = next_month(jan31).unwrap();
/// assert_eq!(next.date(), NaiveDate::from_ymd_opt(2027, 2, 28).unwrap());
/// ```
#[must_use]
pub fn next_month(date: NaiveDateTime) -> Option<NaiveDateTime> {
    let day = date.date();
    let month = (day.month() % 12) + 1;
    let year = if month == 1 { day.year() + 1 } else { day.year() };
    let clamped = day.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, clamped).map(|d| d.and_time(date.time()))
}

/// Apply the maintenance rules to one task in place.
pub fn maintain_task(
    task: &mut ScheduledTask,
    today: NaiveDate,
    policy: &RolloverPolicy,
) -> Disposition {
    if task.is_completed {
        let age = today.signed_duration_since(task.day()).num_days();
        return if age >= i64::from(policy.retention_days) {
            Disposition::Expired
        } else {
            Disposition::Unchanged
        };
    }

    let mut days_rolled = 0;
    let mut escalations = 0;
    loop {
        let overdue = task.day() < today;
        if overdue {
            let Some(next_day) = task.date.checked_add_days(Days::new(1)) else {
                break;
            };
            task.date = next_day;
            task.rollover_count = task.rollover_count.saturating_add(1);
            days_rolled += 1;
        }

        if task.rollover_count >= policy.escalation_threshold {
            if let Some(next) = next_month(task.date) {
                task.date = next;
                task.rollover_count = 0;
                escalations += 1;
            }
        }

        if !overdue {
            break;
        }
    }

    if days_rolled == 0 && escalations == 0 {
        Disposition::Unchanged
    } else {
        Disposition::Moved {
            days_rolled,
            escalations,
        }
    }
}

/// Run the maintenance pass over a whole collection.
///
/// Order of surviving tasks is preserved.
#[must_use]
pub fn rollover(
    tasks: Vec<ScheduledTask>,
    today: NaiveDate,
    policy: &RolloverPolicy,
) -> (Vec<ScheduledTask>, RolloverReport) {
    let mut report = RolloverReport::default();
    let mut kept = Vec::with_capacity(tasks.len());

    for mut task in tasks {
        let disposition = maintain_task(&mut task, today, policy);
        if disposition != Disposition::Unchanged {
            debug!("Task '{}' ({}): {:?}", task.title, task.id, disposition);
        }
        report.record(disposition);
        if disposition != Disposition::Expired {
            kept.push(task);
        }
    }

    info!(
        "Task maintenance for {}: {} rolled, {} escalated, {} expired, {} unchanged",
        today, report.rolled, report.escalated, report.expired, report.unchanged
    );
    (kept, report)
}
