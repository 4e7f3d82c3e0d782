//! Testing infrastructure for levelup.
//!
//! # Architecture
//!
//! - **Mocks**: [`MockStore`] (in-memory gateway with write-failure
//!   injection) and [`FixedClock`]
//! - **Fixtures**: pre-built goal lists and task schedules
//! - **Assertions**: invariant checks for goal ordering
//!
//! # Example
//!
//! ```
//! use levelup::testing::{date, FixedClock, MockStore};
//! use levelup::tasks::TaskScheduler;
//! use levelup::TrackerConfig;
//!
//! let clock = FixedClock::on(date(2026, 10, 19));
//! let (tasks, report) =
//!     TaskScheduler::open(MockStore::new(), clock, &TrackerConfig::default()).unwrap();
//! assert!(tasks.tasks().is_empty());
//! assert!(!report.changed());
//! ```

pub mod assertions;
pub mod fixtures;
pub mod mocks;

pub use assertions::*;
pub use fixtures::*;
pub use mocks::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValueStore;
    use crate::clock::Clock;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_mock_store_counts_writes() {
        let mut store = MockStore::new();
        store
            .set_batch(vec![
                ("a".to_string(), b"1".to_vec()),
                ("b".to_string(), b"2".to_vec()),
            ])
            .unwrap();
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.keys(), ["a", "b"]);
    }

    #[test]
    fn test_mock_store_failed_write_changes_nothing() {
        let mut store = MockStore::new()
            .with_entry("a", b"1".to_vec())
            .with_write_error("boom");
        let err = store.set("a", b"2".to_vec()).unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(store.get("a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::on(date(2026, 10, 19));
        assert_eq!(clock.today(), date(2026, 10, 19));
        assert_eq!(clock.now().hour(), 12);
        assert_eq!(clock.now().day(), 19);
    }

    #[test]
    fn test_goals_in_fixture_is_dense() {
        let goals = goals_in("Work", 5);
        assert_dense_priorities(&goals);
        assert_category_order(&goals, "Work", &["Work 1", "Work 2", "Work 3", "Work 4", "Work 5"]);
    }

    #[test]
    fn test_interleaved_fixture() {
        let goals = interleaved_goals(&["A", "B"], 3);
        assert_eq!(goals.len(), 6);
        assert_dense_priorities(&goals);
        assert_category_order(&goals, "B", &["B 1", "B 2", "B 3"]);
    }

    #[test]
    fn test_schedule_around() {
        let tasks = schedule_around(date(2026, 10, 19), 2);
        // 5 open + 3 completed (offsets 0, 2, 4)
        assert_eq!(tasks.len(), 8);
        assert_eq!(tasks[0].day(), date(2026, 10, 17));
    }
}
