//! Owner of the scheduled-task collection.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use super::model::{ScheduledTask, TaskId};
use super::rollover::{self, RolloverPolicy, RolloverReport};
use crate::clock::{Clock, SystemClock};
use crate::config::TrackerConfig;
use crate::error::Result;
use crate::store::{self, keys, KeyValueStore};

/// Scheduled tasks plus the maintenance pass that keeps them current.
///
/// Like [`GoalBook`](crate::goals::GoalBook), every mutation is written to
/// the store before the in-memory list changes.
#[derive(Debug)]
pub struct TaskScheduler<S, C = SystemClock> {
    store: S,
    clock: C,
    policy: RolloverPolicy,
    tasks: Vec<ScheduledTask>,
}

impl<S: KeyValueStore, C: Clock> TaskScheduler<S, C> {
    /// Load tasks without running maintenance.
    pub fn load(store: S, clock: C, config: &TrackerConfig) -> Self {
        let tasks = store::load_or_default(&store, keys::SAVED_TASKS);
        Self {
            store,
            clock,
            policy: RolloverPolicy::from(config),
            tasks,
        }
    }

    /// Load tasks and run the startup maintenance pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the maintained tasks could not be persisted.
    pub fn open(store: S, clock: C, config: &TrackerConfig) -> Result<(Self, RolloverReport)> {
        let mut scheduler = Self::load(store, clock, config);
        let report = scheduler.maintain()?;
        Ok((scheduler, report))
    }

    fn commit(&mut self, next: Vec<ScheduledTask>) -> Result<()> {
        let entry = store::encode(keys::SAVED_TASKS, &next)?;
        self.store.set_batch(vec![entry])?;
        self.tasks = next;
        Ok(())
    }

    /// All tasks in list order.
    #[must_use]
    pub fn tasks(&self) -> &[ScheduledTask] {
        &self.tasks
    }

    /// Look up a task.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks scheduled on `day`, in list order.
    #[must_use]
    pub fn tasks_on(&self, day: NaiveDate) -> Vec<&ScheduledTask> {
        self.tasks.iter().filter(|t| t.day() == day).collect()
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the backing store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Run the rollover pass for today and persist the result.
    ///
    /// The collection is written even when nothing changed, so storage
    /// always reflects the last pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the tasks could not be persisted.
    pub fn maintain(&mut self) -> Result<RolloverReport> {
        let today = self.clock.today();
        let (next, report) = rollover::rollover(self.tasks.clone(), today, &self.policy);
        self.commit(next)?;
        Ok(report)
    }

    /// Schedule a new task. Blank titles add nothing and return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tasks could not be persisted.
    pub fn add(
        &mut self,
        title: &str,
        description: &str,
        date: NaiveDateTime,
    ) -> Result<Option<TaskId>> {
        let title = title.trim();
        if title.is_empty() {
            debug!("Refusing to add task with blank title");
            return Ok(None);
        }

        let task = ScheduledTask::new(title, date).with_description(description.trim());
        let id = task.id;
        let mut next = self.tasks.clone();
        next.push(task);
        self.commit(next)?;

        info!("Scheduled task {} for {}", id, date.date());
        Ok(Some(id))
    }

    /// Flip a task between open and completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the tasks could not be persisted.
    pub fn toggle_completed(&mut self, id: TaskId) -> Result<bool> {
        let mut next = self.tasks.clone();
        let Some(task) = next.iter_mut().find(|t| t.id == id) else {
            debug!("Task {} not found, nothing to toggle", id);
            return Ok(false);
        };
        task.is_completed = !task.is_completed;
        self.commit(next)?;
        Ok(true)
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the tasks could not be persisted.
    pub fn delete(&mut self, id: TaskId) -> Result<bool> {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            debug!("Task {} not found, nothing to delete", id);
            return Ok(false);
        };
        let mut next = self.tasks.clone();
        next.remove(index);
        self.commit(next)?;
        Ok(true)
    }
}
