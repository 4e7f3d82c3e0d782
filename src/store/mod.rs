//! Persistence gateway.
//!
//! The engine treats storage as a flat key-value space of opaque blobs.
//! [`KeyValueStore`] is the only side-effecting boundary in the crate; the
//! goal, task and workout managers read their collections through
//! [`load_or_default`] and write them back through [`KeyValueStore::set_batch`].
//!
//! # Failure policy
//!
//! - A missing key, an unreadable blob or a blob that fails to decode all
//!   yield the collection's default (empty) value. This covers first run and
//!   corrupted storage; the condition is logged at `warn`.
//! - Writes do fail loudly. A failed batch leaves nothing written.

mod file;

pub use file::FileStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{LevelUpError, Result};

/// Storage keys, one per persisted collection.
pub mod keys {
    /// Active goals, in list order.
    pub const SAVED_GOALS: &str = "SavedGoals";
    /// Completed-goal working list.
    pub const COMPLETED_GOALS: &str = "CompletedGoals";
    /// Durable archive of completed goals.
    pub const ARCHIVED_COMPLETED_GOALS: &str = "ArchivedCompletedGoals";
    /// User-extensible goal categories.
    pub const GOAL_CATEGORIES: &str = "GoalCategories";
    /// Scheduled tasks.
    pub const SAVED_TASKS: &str = "SavedTasks";
    /// Exercise logs grouped by body part.
    pub const WORKOUT_LOGS_BY_PART: &str = "WorkoutLogsByPart";
}

/// A key and its encoded value, ready for a batch write.
pub type Entry = (String, Vec<u8>);

/// Abstraction over the key-value store backing all collections.
///
/// Implementations must make [`set_batch`](KeyValueStore::set_batch)
/// all-or-nothing: after an `Err`, a subsequent `get` of any key in the batch
/// returns what it returned before the call.
///
/// # Example
///
/// ```
/// use levelup::store::KeyValueStore;
/// use levelup::testing::MockStore;
///
/// let mut store = MockStore::new();
/// store.set("SavedTasks", b"[]".to_vec()).unwrap();
/// assert_eq!(store.get("SavedTasks").unwrap(), Some(b"[]".to_vec()));
/// ```
pub trait KeyValueStore {
    /// Fetch the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write several keys atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the write could not be completed; no key in
    /// `entries` is modified in that case.
    fn set_batch(&mut self, entries: Vec<Entry>) -> Result<()>;

    /// Write a single key.
    ///
    /// # Errors
    ///
    /// Returns an error if the write could not be completed.
    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        self.set_batch(vec![(key.to_string(), value)])
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set_batch(&mut self, entries: Vec<Entry>) -> Result<()> {
        (**self).set_batch(entries)
    }
}

/// Load and decode the collection stored under `key`.
///
/// Falls back to `T::default()` when the key is absent, unreadable, or holds
/// a blob that doesn't decode as `T`.
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    load(store, key).unwrap_or_default()
}

/// Load and decode the collection stored under `key`, if there is a usable one.
pub fn load<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let bytes = match store.get(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return None,
        Err(e) => {
            warn!("Failed to read '{}': {}. Starting empty.", key, e);
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Corrupted blob under '{}': {}. Starting empty.", key, e);
            None
        }
    }
}

/// Encode a collection for storage under `key`.
///
/// # Errors
///
/// Returns [`LevelUpError::Encode`] if serialization fails.
pub fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<Entry> {
    let bytes = serde_json::to_vec(value).map_err(|e| LevelUpError::Encode {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    Ok((key.to_string(), bytes))
}
