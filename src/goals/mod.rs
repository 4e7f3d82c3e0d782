//! Goal tracking: prioritised goals per category, completion history, ranks.
//!
//! # Architecture
//!
//! ```text
//! GoalBook
//!   ├── goals: Vec<Goal>                 (SavedGoals)
//!   ├── completed: Vec<CompletedGoal>    (CompletedGoals)
//!   ├── archive: Vec<CompletedGoal>      (ArchivedCompletedGoals)
//!   └── categories: Vec<String>          (GoalCategories)
//! ```
//!
//! Ordering is delegated to [`sequencer`], ranking to [`rank`]. Both are pure
//! and operate on plain slices and vectors.
//!
//! # Lifecycle
//!
//! ```text
//! Active ──complete──> Completed + Archived
//!   │                      │
//!   │ delete               │ remove from view
//!   ▼                      ▼
//! (gone)               Archived only
//! ```
//!
//! Resetting a category purges its completed and archived entries, which
//! drops the category's rank back to the bottom of the ladder. Active goals
//! in the category are not touched.

mod book;
mod model;
pub mod rank;
pub mod sequencer;

pub use book::GoalBook;
pub use model::{CompletedGoal, Goal, GoalId};
pub use rank::{Rank, RankTier};
pub use sequencer::PriorityViolation;
