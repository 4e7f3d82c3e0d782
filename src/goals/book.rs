//! Goal lifecycle: create, reorder, complete, delete, reset.
//!
//! [`GoalBook`] owns the four goal collections and is the only writer of
//! their storage keys. Every mutating call builds the next state on a copy,
//! writes the affected keys in one batch, and only then swaps the copy in.
//! A failed write therefore leaves both memory and storage as they were.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::model::{CompletedGoal, Goal, GoalId};
use super::rank::{self, Rank};
use super::sequencer::{self, PriorityViolation};
use crate::clock::{Clock, SystemClock};
use crate::config::TrackerConfig;
use crate::error::Result;
use crate::store::{self, keys, Entry, KeyValueStore};

/// Which persisted collection a mutation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Goals,
    Completed,
    Archive,
    Categories,
}

#[derive(Debug, Clone, Default)]
struct Ledger {
    goals: Vec<Goal>,
    completed: Vec<CompletedGoal>,
    archive: Vec<CompletedGoal>,
    categories: Vec<String>,
}

impl Ledger {
    fn encode(&self, parts: &[Part]) -> Result<Vec<Entry>> {
        parts
            .iter()
            .map(|part| match part {
                Part::Goals => store::encode(keys::SAVED_GOALS, &self.goals),
                Part::Completed => store::encode(keys::COMPLETED_GOALS, &self.completed),
                Part::Archive => store::encode(keys::ARCHIVED_COMPLETED_GOALS, &self.archive),
                Part::Categories => store::encode(keys::GOAL_CATEGORIES, &self.categories),
            })
            .collect()
    }
}

/// Owner of active, completed and archived goals plus the category list.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use levelup::goals::GoalBook;
/// use levelup::testing::{FixedClock, MockStore};
/// use levelup::TrackerConfig;
///
/// let clock = FixedClock::on(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
/// let mut book = GoalBook::load(MockStore::new(), clock, &TrackerConfig::default());
///
/// let due = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
/// let id = book.create("Max out IRA", due, "Finances", None).unwrap().unwrap();
/// book.complete(id).unwrap();
///
/// assert_eq!(book.archived_count("Finances"), 1);
/// assert_eq!(book.rank("Finances").to_string(), "Iron");
/// ```
#[derive(Debug)]
pub struct GoalBook<S, C = SystemClock> {
    store: S,
    clock: C,
    ledger: Ledger,
}

impl<S: KeyValueStore, C: Clock> GoalBook<S, C> {
    /// Load every goal collection from `store`.
    ///
    /// Missing or corrupt blobs load as empty; a missing category list falls
    /// back to the configured defaults. Persisted goals that break the
    /// priority invariant are repaired in memory and the fault is logged.
    pub fn load(store: S, clock: C, config: &TrackerConfig) -> Self {
        let mut goals: Vec<Goal> = store::load_or_default(&store, keys::SAVED_GOALS);
        let completed = store::load_or_default(&store, keys::COMPLETED_GOALS);
        let archive = store::load_or_default(&store, keys::ARCHIVED_COMPLETED_GOALS);
        let categories = store::load(&store, keys::GOAL_CATEGORIES)
            .unwrap_or_else(|| config.default_categories.clone());

        let repaired = sequencer::normalize(&mut goals);
        if !repaired.is_empty() {
            warn!(
                "Repaired {} priority violation(s) in stored goals",
                repaired.len()
            );
        }

        Self {
            store,
            clock,
            ledger: Ledger {
                goals,
                completed,
                archive,
                categories,
            },
        }
    }

    fn commit(&mut self, next: Ledger, parts: &[Part]) -> Result<()> {
        let entries = next.encode(parts)?;
        self.store.set_batch(entries)?;
        self.ledger = next;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Active goals in list order.
    #[must_use]
    pub fn goals(&self) -> &[Goal] {
        &self.ledger.goals
    }

    /// Completed-goal working list.
    #[must_use]
    pub fn completed(&self) -> &[CompletedGoal] {
        &self.ledger.completed
    }

    /// Durable archive of completed goals.
    #[must_use]
    pub fn archive(&self) -> &[CompletedGoal] {
        &self.ledger.archive
    }

    /// Known categories, defaults first, then user additions.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.ledger.categories
    }

    /// Look up an active goal.
    #[must_use]
    pub fn get(&self, id: GoalId) -> Option<&Goal> {
        self.ledger.goals.iter().find(|g| g.id == id)
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

    // =========================================================================
    // Active goals
    // =========================================================================

    /// Create a goal in `category`.
    ///
    /// `priority` of `None` appends to the category. Unknown categories are
    /// added to the category list. Blank titles or categories create nothing
    /// and return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the goals could not be persisted.
    pub fn create(
        &mut self,
        title: &str,
        due_date: NaiveDate,
        category: &str,
        priority: Option<u32>,
    ) -> Result<Option<GoalId>> {
        let title = title.trim();
        let category = category.trim();
        if title.is_empty() || category.is_empty() {
            debug!("Refusing to create goal with blank title or category");
            return Ok(None);
        }

        let mut next = self.ledger.clone();
        let mut parts = vec![Part::Goals];
        if !next.categories.iter().any(|c| c == category) {
            next.categories.push(category.to_string());
            parts.push(Part::Categories);
        }

        let size = next.goals.iter().filter(|g| g.category == category).count() as u32;
        let goal = Goal::new(title, due_date, category)
            .with_priority(priority.unwrap_or(size + 1));
        let id = goal.id;
        sequencer::insert(&mut next.goals, goal);

        self.commit(next, &parts)?;
        info!("Created goal {} in '{}'", id, category);
        Ok(Some(id))
    }

    fn edit(&mut self, id: GoalId, apply: impl FnOnce(&mut Goal)) -> Result<bool> {
        let mut next = self.ledger.clone();
        let Some(goal) = next.goals.iter_mut().find(|g| g.id == id) else {
            debug!("Goal {} not found, nothing to edit", id);
            return Ok(false);
        };
        apply(goal);
        self.commit(next, &[Part::Goals])?;
        Ok(true)
    }

    /// Set progress, clamped into `[0, 1]`. NaN is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the goals could not be persisted.
    pub fn update_progress(&mut self, id: GoalId, progress: f64) -> Result<bool> {
        if progress.is_nan() {
            debug!("Ignoring NaN progress for goal {}", id);
            return Ok(false);
        }
        self.edit(id, |g| g.progress = progress.clamp(0.0, 1.0))
    }

    /// Change the due date.
    ///
    /// # Errors
    ///
    /// Returns an error if the goals could not be persisted.
    pub fn update_due_date(&mut self, id: GoalId, due_date: NaiveDate) -> Result<bool> {
        self.edit(id, |g| g.due_date = due_date)
    }

    /// Change the title. Blank titles are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the goals could not be persisted.
    pub fn rename(&mut self, id: GoalId, title: &str) -> Result<bool> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(false);
        }
        let title = title.to_string();
        self.edit(id, move |g| g.title = title)
    }

    fn reorder(&mut self, id: GoalId, up: bool) -> Result<bool> {
        let mut next = self.ledger.clone();
        let moved = if up {
            sequencer::move_up(&mut next.goals, id)
        } else {
            sequencer::move_down(&mut next.goals, id)
        };
        if !moved {
            return Ok(false);
        }
        self.commit(next, &[Part::Goals])?;
        Ok(true)
    }

    /// Move a goal one place up in its category.
    ///
    /// Returns `Ok(false)` for unknown goals or goals already first.
    ///
    /// # Errors
    ///
    /// Returns an error if the goals could not be persisted.
    pub fn move_up(&mut self, id: GoalId) -> Result<bool> {
        self.reorder(id, true)
    }

    /// Move a goal one place down in its category.
    ///
    /// Returns `Ok(false)` for unknown goals or goals already last.
    ///
    /// # Errors
    ///
    /// Returns an error if the goals could not be persisted.
    pub fn move_down(&mut self, id: GoalId) -> Result<bool> {
        self.reorder(id, false)
    }

    /// Delete an active goal without completing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the goals could not be persisted.
    pub fn delete(&mut self, id: GoalId) -> Result<bool> {
        let mut next = self.ledger.clone();
        let Some(removed) = sequencer::remove(&mut next.goals, id) else {
            debug!("Goal {} not found, nothing to delete", id);
            return Ok(false);
        };
        self.commit(next, &[Part::Goals])?;
        info!("Deleted goal '{}' from '{}'", removed.title, removed.category);
        Ok(true)
    }

    // =========================================================================
    // Completion
    // =========================================================================

    /// Complete an active goal.
    ///
    /// The goal leaves the active list, is stamped with the current time and
    /// appended to both the completed list and the archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the collections could not be persisted.
    pub fn complete(&mut self, id: GoalId) -> Result<Option<CompletedGoal>> {
        let mut next = self.ledger.clone();
        let Some(goal) = sequencer::remove(&mut next.goals, id) else {
            debug!("Goal {} not found, nothing to complete", id);
            return Ok(None);
        };

        let completed = CompletedGoal::new(goal, self.clock.now());
        next.completed.push(completed.clone());
        next.archive.push(completed.clone());

        self.commit(next, &[Part::Goals, Part::Completed, Part::Archive])?;
        info!(
            "Completed goal '{}' in '{}'",
            completed.goal.title,
            completed.category()
        );
        Ok(Some(completed))
    }

    /// Remove an entry from the completed view.
    ///
    /// The entry is kept in the archive (added if somehow missing), so rank
    /// is unaffected.
    ///
    /// # Errors
    ///
    /// Returns an error if the collections could not be persisted.
    pub fn remove_completed(&mut self, id: GoalId) -> Result<bool> {
        let mut next = self.ledger.clone();
        let Some(index) = next.completed.iter().position(|c| c.id == id) else {
            debug!("Completed goal {} not found, nothing to remove", id);
            return Ok(false);
        };

        let entry = next.completed.remove(index);
        if !next.archive.iter().any(|a| a.id == entry.id) {
            next.archive.push(entry);
        }

        self.commit(next, &[Part::Completed, Part::Archive])?;
        Ok(true)
    }

    /// Purge every completed and archived goal of `category`.
    ///
    /// Active goals stay. Both lists are written in one batch; on error
    /// neither changes. Returns the number of archive entries purged.
    ///
    /// # Errors
    ///
    /// Returns an error if the collections could not be persisted.
    pub fn reset_category(&mut self, category: &str) -> Result<usize> {
        let mut next = self.ledger.clone();
        let archived_before = next.archive.len();
        let completed_before = next.completed.len();

        next.archive.retain(|c| c.category() != category);
        next.completed.retain(|c| c.category() != category);

        let purged = archived_before - next.archive.len();
        if purged == 0 && completed_before == next.completed.len() {
            debug!("Nothing to reset in '{}'", category);
            return Ok(0);
        }

        self.commit(next, &[Part::Archive, Part::Completed])?;
        info!("Reset '{}': purged {} archived goal(s)", category, purged);
        Ok(purged)
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Add a category. Blank or already known names are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the categories could not be persisted.
    pub fn add_category(&mut self, category: &str) -> Result<bool> {
        let category = category.trim();
        if category.is_empty() || self.ledger.categories.iter().any(|c| c == category) {
            return Ok(false);
        }
        let mut next = self.ledger.clone();
        next.categories.push(category.to_string());
        self.commit(next, &[Part::Categories])?;
        Ok(true)
    }

    // =========================================================================
    // Ranks and views
    // =========================================================================

    /// Archive entries in `category`.
    #[must_use]
    pub fn archived_count(&self, category: &str) -> usize {
        rank::count_in_category(&self.ledger.archive, category)
    }

    /// Rank of `category`, counted over the archive.
    #[must_use]
    pub fn rank(&self, category: &str) -> Rank {
        rank::rank_for_category(&self.ledger.archive, category)
    }

    /// Fraction of the way to the next rank in `category`.
    #[must_use]
    pub fn progress_to_next(&self, category: &str) -> f64 {
        rank::progress_to_next(self.archived_count(category))
    }

    /// Rank across all categories.
    #[must_use]
    pub fn overall_rank(&self) -> Rank {
        rank::overall_rank(&self.ledger.archive)
    }

    /// Active goals grouped by category, each in priority order.
    #[must_use]
    pub fn active_by_category(&self) -> Vec<(String, Vec<&Goal>)> {
        sequencer::grouped(&self.ledger.goals, &self.ledger.categories)
    }

    /// Completed working list grouped by category name.
    #[must_use]
    pub fn completed_by_category(&self) -> BTreeMap<&str, Vec<&CompletedGoal>> {
        let mut grouped: BTreeMap<&str, Vec<&CompletedGoal>> = BTreeMap::new();
        for entry in &self.ledger.completed {
            grouped.entry(entry.category()).or_default().push(entry);
        }
        grouped
    }

    /// Check the active goals against the priority invariant.
    #[must_use]
    pub fn verify(&self) -> Vec<PriorityViolation> {
        sequencer::verify(&self.ledger.goals)
    }
}
