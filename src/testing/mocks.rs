//! Mock implementations of the store and clock.
//!
//! These mocks provide controllable test doubles for the engine's two
//! external dependencies, enabling deterministic unit tests.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::clock::Clock;
use crate::error::{LevelUpError, Result};
use crate::store::{Entry, KeyValueStore};

/// In-memory key-value store.
///
/// Batch writes are applied under one `&mut` borrow, so they are trivially
/// atomic. Writes can be configured to fail.
///
/// # Example
///
/// ```
/// use levelup::store::KeyValueStore;
/// use levelup::testing::MockStore;
///
/// let mut store = MockStore::new().with_write_error("disk full");
/// assert!(store.set("SavedGoals", b"[]".to_vec()).is_err());
/// assert_eq!(store.get("SavedGoals").unwrap(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    entries: HashMap<String, Vec<u8>>,
    write_error: Option<String>,
    writes: u32,
}

impl MockStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a raw blob.
    #[must_use]
    pub fn with_entry(mut self, key: &str, value: Vec<u8>) -> Self {
        self.entries.insert(key.to_string(), value);
        self
    }

    /// Pre-populate a key with the JSON encoding of `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` cannot be serialized.
    #[must_use]
    pub fn with_json<T: Serialize + ?Sized>(self, key: &str, value: &T) -> Self {
        let bytes = serde_json::to_vec(value).expect("mock value should serialize");
        self.with_entry(key, bytes)
    }

    /// Configure every subsequent write to fail.
    #[must_use]
    pub fn with_write_error(mut self, error: &str) -> Self {
        self.write_error = Some(error.to_string());
        self
    }

    /// Number of successful batch writes.
    #[must_use]
    pub fn write_count(&self) -> u32 {
        self.writes
    }

    /// Keys currently stored.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl KeyValueStore for MockStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_batch(&mut self, entries: Vec<Entry>) -> Result<()> {
        if let Some(ref error) = self.write_error {
            let key = entries
                .first()
                .map(|(k, _)| k.clone())
                .unwrap_or_default();
            return Err(LevelUpError::store(key, error.clone()));
        }
        self.entries.extend(entries);
        self.writes += 1;
        Ok(())
    }
}

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    /// A clock reading noon UTC on `day`, with `day` as the local date.
    #[must_use]
    pub fn on(day: NaiveDate) -> Self {
        Self {
            now: day.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()).and_utc(),
            today: day,
        }
    }

    /// A clock with an explicit instant and local date.
    #[must_use]
    pub fn at(now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self { now, today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
