//! Dense priority ordering of goals within categories.
//!
//! Goals from every category share one list. Within a category, list order
//! *is* priority order: every structural change rewrites the category's
//! priorities to `1..=N` following list order. Stored priority values are
//! never swapped or compared to decide adjacency.
//!
//! # Invariant
//!
//! For every category with `N` goals, the priorities of those goals are
//! exactly `{1, ..., N}` and increase along the list.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, error};

use super::model::{Goal, GoalId};

/// A breach of the dense-priority invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriorityViolation {
    /// Two goals in the category share a priority
    Duplicate { category: String, priority: u32 },
    /// A priority in `1..=N` is not used by any goal
    Missing { category: String, priority: u32 },
    /// Priorities are dense but disagree with list order
    OutOfOrder { category: String },
}

impl fmt::Display for PriorityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityViolation::Duplicate { category, priority } => {
                write!(f, "'{}' has priority {} more than once", category, priority)
            }
            PriorityViolation::Missing { category, priority } => {
                write!(f, "'{}' is missing priority {}", category, priority)
            }
            PriorityViolation::OutOfOrder { category } => {
                write!(f, "'{}' priorities disagree with list order", category)
            }
        }
    }
}

/// Global indices of the goals in `category`, in list order.
fn positions(goals: &[Goal], category: &str) -> Vec<usize> {
    goals
        .iter()
        .enumerate()
        .filter(|(_, g)| g.category == category)
        .map(|(i, _)| i)
        .collect()
}

/// Rewrite the priorities of `category` to `1..=N` in list order.
///
/// Call after removing a goal to close the gap it left.
pub fn renumber(goals: &mut [Goal], category: &str) {
    let mut next = 1;
    for goal in goals.iter_mut().filter(|g| g.category == category) {
        goal.priority = next;
        next += 1;
    }
}

/// Insert `goal` at its requested priority within its category.
///
/// The request is clamped into `[1, N + 1]` where `N` is the current size of
/// the category. The goal lands directly before the goal currently holding
/// that priority, or at the end of the list when appending.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use levelup::goals::{sequencer, Goal};
///
/// let due = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
/// let mut goals = Vec::new();
/// sequencer::insert(&mut goals, Goal::new("a", due, "Work"));
/// sequencer::insert(&mut goals, Goal::new("b", due, "Work"));
/// sequencer::insert(&mut goals, Goal::new("c", due, "Work").with_priority(2));
///
/// let titles: Vec<_> = goals.iter().map(|g| (g.title.as_str(), g.priority)).collect();
/// assert_eq!(titles, [("b", 1), ("c", 2), ("a", 3)]);
/// ```
pub fn insert(goals: &mut Vec<Goal>, goal: Goal) {
    let category = goal.category.clone();
    let members = positions(goals, &category);
    let slot = (goal.priority.max(1) as usize - 1).min(members.len());
    let index = members.get(slot).copied().unwrap_or(goals.len());

    debug!(
        "Inserting '{}' into '{}' at slot {} (list index {})",
        goal.title, category, slot, index
    );
    goals.insert(index, goal);
    renumber(goals, &category);
}

/// Swap the goal with the adjacent goal of its category, in list order.
fn shift(goals: &mut [Goal], id: GoalId, toward_front: bool) -> bool {
    let Some(category) = goals.iter().find(|g| g.id == id).map(|g| g.category.clone()) else {
        debug!("Goal {} not found, nothing to move", id);
        return false;
    };

    let members = positions(goals, &category);
    let Some(local) = members.iter().position(|&i| goals[i].id == id) else {
        return false;
    };

    let neighbour = if toward_front {
        local.checked_sub(1)
    } else {
        Some(local + 1).filter(|&n| n < members.len())
    };
    let Some(neighbour) = neighbour else {
        return false;
    };

    goals.swap(members[local], members[neighbour]);
    renumber(goals, &category);
    true
}

/// Move a goal one place toward the front of its category.
///
/// Returns `false` if the goal is unknown or already first.
pub fn move_up(goals: &mut [Goal], id: GoalId) -> bool {
    shift(goals, id, true)
}

/// Move a goal one place toward the back of its category.
///
/// Returns `false` if the goal is unknown or already last.
pub fn move_down(goals: &mut [Goal], id: GoalId) -> bool {
    shift(goals, id, false)
}

/// Remove a goal and close the gap in its category.
pub fn remove(goals: &mut Vec<Goal>, id: GoalId) -> Option<Goal> {
    let index = goals.iter().position(|g| g.id == id)?;
    let removed = goals.remove(index);
    renumber(goals, &removed.category);
    Some(removed)
}

/// Categories present in `goals`, in order of first appearance.
#[must_use]
pub fn categories(goals: &[Goal]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for goal in goals {
        if !seen.iter().any(|c| *c == goal.category) {
            seen.push(goal.category.clone());
        }
    }
    seen
}

/// Check every category against the dense-priority invariant.
#[must_use]
pub fn verify(goals: &[Goal]) -> Vec<PriorityViolation> {
    let mut violations = Vec::new();

    for category in categories(goals) {
        let priorities: Vec<u32> = goals
            .iter()
            .filter(|g| g.category == category)
            .map(|g| g.priority)
            .collect();

        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for p in &priorities {
            *counts.entry(*p).or_default() += 1;
        }

        let before = violations.len();
        for (&priority, &n) in &counts {
            if n > 1 {
                violations.push(PriorityViolation::Duplicate {
                    category: category.clone(),
                    priority,
                });
            }
        }
        for priority in 1..=priorities.len() as u32 {
            if !counts.contains_key(&priority) {
                violations.push(PriorityViolation::Missing {
                    category: category.clone(),
                    priority,
                });
            }
        }

        if violations.len() == before && priorities.windows(2).any(|w| w[0] > w[1]) {
            violations.push(PriorityViolation::OutOfOrder { category });
        }
    }

    violations
}

/// Restore the invariant for every category.
///
/// Goals are stably re-sorted by their stored priority within the slots their
/// category already occupies, then renumbered. Returns the violations that
/// were found, each logged as an internal-consistency fault.
pub fn normalize(goals: &mut [Goal]) -> Vec<PriorityViolation> {
    let violations = verify(goals);
    if violations.is_empty() {
        return violations;
    }

    for violation in &violations {
        error!("Priority invariant violated: {}", violation);
    }

    for category in categories(goals) {
        let slots = positions(goals, &category);
        let mut members: Vec<Goal> = slots.iter().map(|&i| goals[i].clone()).collect();
        members.sort_by_key(|g| g.priority);
        for (slot, goal) in slots.into_iter().zip(members) {
            goals[slot] = goal;
        }
        renumber(goals, &category);
    }

    violations
}

/// Goals of `category` in priority order.
#[must_use]
pub fn ordered<'a>(goals: &'a [Goal], category: &str) -> Vec<&'a Goal> {
    let mut members: Vec<&Goal> = goals.iter().filter(|g| g.category == category).collect();
    members.sort_by_key(|g| g.priority);
    members
}

/// Per-category view of `goals`.
///
/// Categories follow `known` first, then any others in order of first
/// appearance. Empty categories are omitted. The view is rebuilt on every
/// call and never stored.
#[must_use]
pub fn grouped<'a>(goals: &'a [Goal], known: &[String]) -> Vec<(String, Vec<&'a Goal>)> {
    let mut order: Vec<String> = known.to_vec();
    for category in categories(goals) {
        if !order.contains(&category) {
            order.push(category);
        }
    }

    order
        .into_iter()
        .map(|category| {
            let members = ordered(goals, &category);
            (category, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::assert_dense_priorities;
    use chrono::NaiveDate;

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 12, 1).unwrap()
    }

    fn append(goals: &mut Vec<Goal>, title: &str, category: &str) -> GoalId {
        let count = goals.iter().filter(|g| g.category == category).count() as u32;
        let goal = Goal::new(title, due(), category).with_priority(count + 1);
        let id = goal.id;
        insert(goals, goal);
        id
    }

    fn titles(goals: &[Goal], category: &str) -> Vec<(String, u32)> {
        ordered(goals, category)
            .into_iter()
            .map(|g| (g.title.clone(), g.priority))
            .collect()
    }

    fn work_three() -> (Vec<Goal>, [GoalId; 3]) {
        let mut goals = Vec::new();
        let a = append(&mut goals, "first", "Work");
        let b = append(&mut goals, "second", "Work");
        let c = append(&mut goals, "third", "Work");
        (goals, [a, b, c])
    }

    #[test]
    fn test_insert_into_empty_category_gets_one() {
        let mut goals = Vec::new();
        insert(&mut goals, Goal::new("solo", due(), "Personal").with_priority(7));
        assert_eq!(goals[0].priority, 1);
    }

    #[test]
    fn test_insert_zero_priority_clamps_to_front() {
        let (mut goals, _) = work_three();
        insert(&mut goals, Goal::new("zero", due(), "Work").with_priority(0));
        assert_eq!(titles(&goals, "Work")[0], ("zero".to_string(), 1));
        assert_dense_priorities(&goals);
    }

    #[test]
    fn test_insert_requesting_second_slot() {
        let (mut goals, _) = work_three();
        insert(&mut goals, Goal::new("new", due(), "Work").with_priority(2));

        assert_eq!(
            titles(&goals, "Work"),
            vec![
                ("first".to_string(), 1),
                ("new".to_string(), 2),
                ("second".to_string(), 3),
                ("third".to_string(), 4),
            ]
        );
    }

    #[test]
    fn test_insert_beyond_end_appends() {
        let (mut goals, _) = work_three();
        insert(&mut goals, Goal::new("last", due(), "Work").with_priority(99));
        assert_eq!(titles(&goals, "Work")[3], ("last".to_string(), 4));
    }

    #[test]
    fn test_insert_leaves_other_categories_alone() {
        let (mut goals, _) = work_three();
        append(&mut goals, "save", "Finances");
        append(&mut goals, "invest", "Finances");
        insert(&mut goals, Goal::new("budget", due(), "Finances").with_priority(1));
        insert(&mut goals, Goal::new("urgent", due(), "Work").with_priority(1));

        assert_eq!(
            titles(&goals, "Finances"),
            vec![
                ("budget".to_string(), 1),
                ("save".to_string(), 2),
                ("invest".to_string(), 3),
            ]
        );
        assert_eq!(titles(&goals, "Work")[0], ("urgent".to_string(), 1));
        assert_dense_priorities(&goals);
    }

    #[test]
    fn test_move_down_first_goal() {
        let (mut goals, [a, _, _]) = work_three();
        assert!(move_down(&mut goals, a));
        assert_eq!(
            titles(&goals, "Work"),
            vec![
                ("second".to_string(), 1),
                ("first".to_string(), 2),
                ("third".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_move_up_at_boundary_is_noop() {
        let (mut goals, [a, _, c]) = work_three();
        let before = goals.clone();
        assert!(!move_up(&mut goals, a));
        assert!(!move_down(&mut goals, c));
        assert_eq!(goals, before);
    }

    #[test]
    fn test_move_skips_interleaved_categories() {
        let mut goals = Vec::new();
        let a = append(&mut goals, "a", "Work");
        append(&mut goals, "x", "Personal");
        append(&mut goals, "b", "Work");

        assert!(move_down(&mut goals, a));
        assert_eq!(
            titles(&goals, "Work"),
            vec![("b".to_string(), 1), ("a".to_string(), 2)]
        );
        assert_eq!(titles(&goals, "Personal"), vec![("x".to_string(), 1)]);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let (mut goals, _) = work_three();
        let before = goals.clone();
        let stranger = GoalId::new();
        assert!(!move_up(&mut goals, stranger));
        assert!(!move_down(&mut goals, stranger));
        assert!(remove(&mut goals, stranger).is_none());
        assert_eq!(goals, before);
    }

    #[test]
    fn test_remove_closes_gap() {
        let (mut goals, [_, b, _]) = work_three();
        let removed = remove(&mut goals, b).unwrap();
        assert_eq!(removed.title, "second");
        assert_eq!(
            titles(&goals, "Work"),
            vec![("first".to_string(), 1), ("third".to_string(), 2)]
        );
    }

    #[test]
    fn test_invariant_holds_over_mixed_sequence() {
        let mut goals = Vec::new();
        let mut ids = Vec::new();
        let cats = ["Work", "Finances", "Personal"];

        for step in 0..60usize {
            let category = cats[step % cats.len()];
            match step % 5 {
                0 | 1 => {
                    let goal = Goal::new(format!("g{step}"), due(), category)
                        .with_priority((step % 4) as u32);
                    ids.push(goal.id);
                    insert(&mut goals, goal);
                }
                2 => {
                    if let Some(&id) = ids.get(step % ids.len().max(1)) {
                        move_up(&mut goals, id);
                    }
                }
                3 => {
                    if let Some(&id) = ids.get((step * 7) % ids.len().max(1)) {
                        move_down(&mut goals, id);
                    }
                }
                _ => {
                    if !ids.is_empty() {
                        let id = ids.remove((step * 3) % ids.len());
                        remove(&mut goals, id);
                    }
                }
            }
            assert_dense_priorities(&goals);
        }
    }

    #[test]
    fn test_verify_reports_gap_and_duplicate() {
        let (mut goals, _) = work_three();
        goals[1].priority = 1;
        goals[2].priority = 5;

        let violations = verify(&goals);
        assert!(violations.contains(&PriorityViolation::Duplicate {
            category: "Work".into(),
            priority: 1
        }));
        assert!(violations.contains(&PriorityViolation::Missing {
            category: "Work".into(),
            priority: 2
        }));
    }

    #[test]
    fn test_normalize_sorts_by_stored_priority() {
        let (mut goals, _) = work_three();
        goals[0].priority = 3;
        goals[1].priority = 1;
        goals[2].priority = 2;

        let violations = normalize(&mut goals);
        assert_eq!(
            violations,
            vec![PriorityViolation::OutOfOrder {
                category: "Work".into()
            }]
        );
        let order: Vec<&str> = goals.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(order, ["second", "third", "first"]);
        assert!(verify(&goals).is_empty());
    }

    #[test]
    fn test_grouped_follows_known_order_then_extras() {
        let mut goals = Vec::new();
        append(&mut goals, "hike", "Outdoors");
        append(&mut goals, "ship", "Work");
        append(&mut goals, "call mom", "Personal");

        let known = vec!["Finances".to_string(), "Personal".into(), "Work".into()];
        let view = grouped(&goals, &known);
        let names: Vec<&str> = view.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, ["Personal", "Work", "Outdoors"]);
    }
}
