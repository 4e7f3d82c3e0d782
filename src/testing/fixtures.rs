//! Test fixtures for building reproducible collections.
//!
//! Provides pre-built goal lists and task schedules for consistent testing
//! and benchmarking.

use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::goals::{sequencer, Goal};
use crate::tasks::ScheduledTask;

/// Calendar date, panicking on invalid input.
///
/// # Panics
///
/// Panics if the date does not exist.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("fixture date should be valid")
}

/// 09:00 on the given day.
///
/// # Panics
///
/// Panics if the date does not exist.
#[must_use]
pub fn morning(year: i32, month: u32, day: u32) -> NaiveDateTime {
    date(year, month, day)
        .and_hms_opt(9, 0, 0)
        .expect("fixture time should be valid")
}

/// `count` goals named `"{category} {i}"`, appended in order through the
/// sequencer so priorities are already dense.
#[must_use]
pub fn goals_in(category: &str, count: usize) -> Vec<Goal> {
    let mut goals = Vec::with_capacity(count);
    let due = date(2026, 12, 31);
    for i in 1..=count {
        let goal = Goal::new(format!("{category} {i}"), due, category).with_priority(i as u32);
        sequencer::insert(&mut goals, goal);
    }
    goals
}

/// Goals from several categories, interleaved round-robin in list order.
#[must_use]
pub fn interleaved_goals(categories: &[&str], per_category: usize) -> Vec<Goal> {
    let mut goals = Vec::with_capacity(categories.len() * per_category);
    let due = date(2026, 12, 31);
    for i in 1..=per_category {
        for category in categories {
            let goal =
                Goal::new(format!("{category} {i}"), due, *category).with_priority(i as u32);
            sequencer::insert(&mut goals, goal);
        }
    }
    goals
}

/// A mixed schedule around `today`: for every offset in `-span..=span`
/// days there is one open task and, on even offsets, one completed task.
#[must_use]
pub fn schedule_around(today: NaiveDate, span: u64) -> Vec<ScheduledTask> {
    let mut tasks = Vec::new();
    let start = today.checked_sub_days(Days::new(span)).unwrap_or(today);
    for offset in 0..=(span * 2) {
        let Some(day) = start.checked_add_days(Days::new(offset)) else {
            continue;
        };
        let Some(when) = day.and_hms_opt(9, 0, 0) else {
            continue;
        };
        tasks.push(ScheduledTask::new(format!("open {offset}"), when));
        if offset % 2 == 0 {
            tasks.push(ScheduledTask::new(format!("done {offset}"), when).completed());
        }
    }
    tasks
}
