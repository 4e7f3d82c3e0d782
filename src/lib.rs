//! LevelUp - Personal Progress Tracker
//!
//! A stateful list-management engine for goals, scheduled tasks and workout
//! logs, persisted through an abstract key-value store.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`goals`] - Prioritised goals per category, completion history and ranks
//! - [`tasks`] - Scheduled tasks and the daily rollover pass
//! - [`workouts`] - Exercise logs grouped by body part
//! - [`store`] - Persistence gateway trait and the file-backed store
//! - [`clock`] - Time source abstraction
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Custom error types and handling
//! - [`testing`] - Testing infrastructure (mocks, fixtures, assertions)
//!
//! # Example
//!
//! ```
//! use levelup::testing::{date, FixedClock, MockStore};
//! use levelup::{GoalBook, TrackerConfig};
//!
//! let config = TrackerConfig::default();
//! let clock = FixedClock::on(date(2026, 10, 19));
//! let mut book = GoalBook::load(MockStore::new(), clock, &config);
//!
//! let id = book
//!     .create("Save 1000", date(2026, 12, 31), "Finances", None)?
//!     .expect("title is not blank");
//! book.complete(id)?;
//!
//! assert_eq!(book.archived_count("Finances"), 1);
//! assert_eq!(book.rank("Finances").to_string(), "Iron");
//! # Ok::<(), levelup::LevelUpError>(())
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod goals;
pub mod store;
pub mod tasks;
pub mod testing;
pub mod workouts;

// Re-export commonly used types
pub use error::{LevelUpError, Result};

pub use clock::{Clock, SystemClock};
pub use config::TrackerConfig;
pub use store::{FileStore, KeyValueStore};

// Re-export engine types
pub use goals::{CompletedGoal, Goal, GoalBook, GoalId, PriorityViolation, Rank, RankTier};
pub use tasks::{RolloverPolicy, RolloverReport, ScheduledTask, TaskId, TaskScheduler};
pub use workouts::{BodyPart, ExerciseLog, LogId, LoggedSet, WorkoutLog};
