//! Custom assertions for domain-specific testing.

use crate::goals::{sequencer, Goal};

/// Assert that every category satisfies the dense-priority invariant.
///
/// # Panics
///
/// Panics listing every violation found.
///
/// # Example
///
/// ```
/// use levelup::testing::{assert_dense_priorities, goals_in};
///
/// assert_dense_priorities(&goals_in("Work", 4));
/// ```
pub fn assert_dense_priorities(goals: &[Goal]) {
    let violations = sequencer::verify(goals);
    assert!(
        violations.is_empty(),
        "Expected dense priorities, found {} violation(s):\n{}",
        violations.len(),
        violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Assert the titles of `category` in priority order.
///
/// # Panics
///
/// Panics if the order differs.
pub fn assert_category_order(goals: &[Goal], category: &str, expected: &[&str]) {
    let actual: Vec<&str> = sequencer::ordered(goals, category)
        .into_iter()
        .map(|g| g.title.as_str())
        .collect();
    assert_eq!(
        actual, expected,
        "Unexpected order for category '{}'",
        category
    );
}
