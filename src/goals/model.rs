//! Goal and completed-goal records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a goal.
///
/// A completed goal keeps the id of the goal it was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(Uuid);

impl GoalId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GoalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GoalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// An active goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub due_date: NaiveDate,
    /// Fraction complete, in `[0, 1]`
    pub progress: f64,
    /// Position within the category, 1-based
    pub priority: u32,
    pub category: String,
}

impl Goal {
    /// Create a goal with zero progress that asks to be first in its category.
    #[must_use]
    pub fn new(title: impl Into<String>, due_date: NaiveDate, category: impl Into<String>) -> Self {
        Self {
            id: GoalId::new(),
            title: title.into(),
            due_date,
            progress: 0.0,
            priority: 1,
            category: category.into(),
        }
    }

    /// Set the requested priority. It is clamped on insertion.
    #[must_use]
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Progress as a whole percentage, for display.
    #[must_use]
    pub fn percent(&self) -> u32 {
        (self.progress.clamp(0.0, 1.0) * 100.0) as u32
    }
}

/// Snapshot of a goal at the moment it was completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedGoal {
    pub id: GoalId,
    pub goal: Goal,
    pub completed_date: DateTime<Utc>,
}

impl CompletedGoal {
    /// Wrap `goal`, completed at `completed_date`.
    #[must_use]
    pub fn new(goal: Goal, completed_date: DateTime<Utc>) -> Self {
        Self {
            id: goal.id,
            goal,
            completed_date,
        }
    }

    /// Category of the wrapped goal.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.goal.category
    }
}
