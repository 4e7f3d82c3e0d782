//! Workout logging by body part.
//!
//! Plain CRUD over exercise logs, persisted under `WorkoutLogsByPart` as a
//! map from body part to logs. Each exercise appears at most once per body
//! part.

mod model;

pub use model::{BodyPart, ExerciseLog, LogId, LoggedSet, ParseBodyPartError};

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::TrackerConfig;
use crate::error::Result;
use crate::store::{self, keys, KeyValueStore};

type LogsByPart = BTreeMap<BodyPart, Vec<ExerciseLog>>;

/// Owner of all exercise logs.
#[derive(Debug)]
pub struct WorkoutLog<S, C = SystemClock> {
    store: S,
    clock: C,
    initial_sets: usize,
    logs: LogsByPart,
}

impl<S: KeyValueStore, C: Clock> WorkoutLog<S, C> {
    /// Load logs from `store`; missing or corrupt data loads as empty.
    pub fn load(store: S, clock: C, config: &TrackerConfig) -> Self {
        let logs = store::load_or_default(&store, keys::WORKOUT_LOGS_BY_PART);
        Self {
            store,
            clock,
            initial_sets: config.initial_sets,
            logs,
        }
    }

    fn commit(&mut self, next: LogsByPart) -> Result<()> {
        let entry = store::encode(keys::WORKOUT_LOGS_BY_PART, &next)?;
        self.store.set_batch(vec![entry])?;
        self.logs = next;
        Ok(())
    }

    fn edit(&mut self, id: LogId, apply: impl FnOnce(&mut ExerciseLog) -> bool) -> Result<bool> {
        let mut next = self.logs.clone();
        let Some(log) = next.values_mut().flatten().find(|l| l.id == id) else {
            debug!("Exercise log {} not found", id);
            return Ok(false);
        };
        if !apply(log) {
            return Ok(false);
        }
        self.commit(next)?;
        Ok(true)
    }

    /// Logs for `part`, oldest first.
    #[must_use]
    pub fn logs_for(&self, part: BodyPart) -> &[ExerciseLog] {
        self.logs.get(&part).map(Vec::as_slice).unwrap_or_default()
    }

    /// Look up a log by id.
    #[must_use]
    pub fn get(&self, id: LogId) -> Option<&ExerciseLog> {
        self.logs.values().flatten().find(|l| l.id == id)
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start logging `exercise` under `part` with the configured number of
    /// empty sets.
    ///
    /// Blank names and exercises already logged under `part` return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the logs could not be persisted.
    pub fn add_exercise(&mut self, part: BodyPart, exercise: &str) -> Result<Option<LogId>> {
        let name = exercise.trim();
        if name.is_empty() || self.logs_for(part).iter().any(|l| l.exercise_name == name) {
            debug!("Not adding '{}' to {}", name, part);
            return Ok(None);
        }

        let log = ExerciseLog {
            id: LogId::new(),
            exercise_name: name.to_string(),
            body_part: part,
            sets: (0..self.initial_sets).map(|_| LoggedSet::empty()).collect(),
            date: self.clock.now(),
        };
        let id = log.id;

        let mut next = self.logs.clone();
        next.entry(part).or_default().push(log);
        self.commit(next)?;

        info!("Logging '{}' on {} day", name, part);
        Ok(Some(id))
    }

    /// Append an empty set.
    ///
    /// # Errors
    ///
    /// Returns an error if the logs could not be persisted.
    pub fn add_set(&mut self, id: LogId) -> Result<bool> {
        self.edit(id, |log| {
            log.sets.push(LoggedSet::empty());
            true
        })
    }

    /// Drop the last set. No-op when there are none.
    ///
    /// # Errors
    ///
    /// Returns an error if the logs could not be persisted.
    pub fn remove_last_set(&mut self, id: LogId) -> Result<bool> {
        self.edit(id, |log| log.sets.pop().is_some())
    }

    /// Record weight and reps for the set at `index` (0-based).
    ///
    /// # Errors
    ///
    /// Returns an error if the logs could not be persisted.
    pub fn update_set(&mut self, id: LogId, index: usize, weight: u32, reps: u32) -> Result<bool> {
        self.edit(id, |log| match log.sets.get_mut(index) {
            Some(set) => {
                set.weight = weight;
                set.reps = reps;
                true
            }
            None => false,
        })
    }

    /// Delete a log.
    ///
    /// # Errors
    ///
    /// Returns an error if the logs could not be persisted.
    pub fn delete(&mut self, id: LogId) -> Result<bool> {
        let mut next = self.logs.clone();
        let mut removed = false;
        for logs in next.values_mut() {
            let before = logs.len();
            logs.retain(|l| l.id != id);
            removed |= logs.len() != before;
        }
        if !removed {
            debug!("Exercise log {} not found, nothing to delete", id);
            return Ok(false);
        }
        next.retain(|_, logs| !logs.is_empty());
        self.commit(next)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedClock, MockStore};
    use chrono::NaiveDate;

    fn workouts() -> WorkoutLog<MockStore, FixedClock> {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        WorkoutLog::load(MockStore::new(), clock, &TrackerConfig::default())
    }

    #[test]
    fn test_add_exercise_starts_with_five_empty_sets() {
        let mut w = workouts();
        let id = w.add_exercise(BodyPart::Chest, "Bench Press").unwrap().unwrap();

        let log = w.get(id).unwrap();
        assert_eq!(log.sets.len(), 5);
        assert!(log.sets.iter().all(|s| s.weight == 0 && s.reps == 0));
        assert_eq!(log.body_part, BodyPart::Chest);
    }

    #[test]
    fn test_duplicate_exercise_per_part_rejected() {
        let mut w = workouts();
        w.add_exercise(BodyPart::Back, "Hammer Curl").unwrap().unwrap();
        assert!(w.add_exercise(BodyPart::Back, "Hammer Curl").unwrap().is_none());
        assert!(w.add_exercise(BodyPart::Shoulders, "Hammer Curl").unwrap().is_some());
        assert!(w.add_exercise(BodyPart::Back, " ").unwrap().is_none());
    }

    #[test]
    fn test_set_editing() {
        let mut w = workouts();
        let id = w.add_exercise(BodyPart::Legs, "Squats").unwrap().unwrap();

        assert!(w.update_set(id, 0, 225, 5).unwrap());
        assert!(!w.update_set(id, 10, 1, 1).unwrap());
        assert!(w.add_set(id).unwrap());
        assert_eq!(w.get(id).unwrap().sets.len(), 6);

        for _ in 0..6 {
            assert!(w.remove_last_set(id).unwrap());
        }
        assert!(!w.remove_last_set(id).unwrap());
        assert!(w.get(id).unwrap().sets.is_empty());
    }

    #[test]
    fn test_delete_and_persistence() {
        let mut w = workouts();
        let squat = w.add_exercise(BodyPart::Legs, "Squats").unwrap().unwrap();
        w.add_exercise(BodyPart::Legs, "Leg Curl").unwrap().unwrap();

        assert!(w.delete(squat).unwrap());
        assert!(!w.delete(squat).unwrap());

        let stored: BTreeMap<BodyPart, Vec<ExerciseLog>> =
            store::load_or_default(w.store(), keys::WORKOUT_LOGS_BY_PART);
        assert_eq!(stored[&BodyPart::Legs].len(), 1);
        assert_eq!(stored[&BodyPart::Legs][0].exercise_name, "Leg Curl");
    }

    #[test]
    fn test_stored_map_keys_are_part_names() {
        let mut w = workouts();
        w.add_exercise(BodyPart::Rest, "Swimming").unwrap();

        let raw = w.store().get(keys::WORKOUT_LOGS_BY_PART).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert!(json.get("Rest").is_some());
    }

    #[test]
    fn test_unknown_log_is_noop() {
        let mut w = workouts();
        let stranger = LogId::new();
        assert!(!w.add_set(stranger).unwrap());
        assert!(!w.remove_last_set(stranger).unwrap());
        assert_eq!(w.store().write_count(), 0);
    }
}
