//! Scheduled task record.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A task pinned to a day.
///
/// `date` is local wall-clock time; only its calendar day matters for
/// rollover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDateTime,
    #[serde(default)]
    pub is_completed: bool,
    /// Times this task was pushed forward for being overdue
    #[serde(default)]
    pub rollover_count: u32,
}

impl ScheduledTask {
    /// Create an open task with no rollovers.
    #[must_use]
    pub fn new(title: impl Into<String>, date: NaiveDateTime) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            description: String::new(),
            date,
            is_completed: false,
            rollover_count: 0,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the task completed.
    #[must_use]
    pub fn completed(mut self) -> Self {
        self.is_completed = true;
        self
    }

    /// Calendar day the task is scheduled for.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}
