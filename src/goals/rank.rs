//! Rank ladder derived from completed-goal counts.
//!
//! Every ten completions climb one tier. Past the last tier the ladder keeps
//! going with numbered sub-tiers: 100 completions is "Challenger 1", 110 is
//! "Challenger 2", and so on.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::model::CompletedGoal;

/// Completions needed to climb one tier.
pub const GOALS_PER_TIER: usize = 10;

/// Named rank tiers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RankTier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

impl RankTier {
    /// The full ladder, lowest first.
    pub const ALL: [RankTier; 10] = [
        RankTier::Iron,
        RankTier::Bronze,
        RankTier::Silver,
        RankTier::Gold,
        RankTier::Platinum,
        RankTier::Emerald,
        RankTier::Diamond,
        RankTier::Master,
        RankTier::Grandmaster,
        RankTier::Challenger,
    ];

    /// Display name of the tier.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            RankTier::Iron => "Iron",
            RankTier::Bronze => "Bronze",
            RankTier::Silver => "Silver",
            RankTier::Gold => "Gold",
            RankTier::Platinum => "Platinum",
            RankTier::Emerald => "Emerald",
            RankTier::Diamond => "Diamond",
            RankTier::Master => "Master",
            RankTier::Grandmaster => "Grandmaster",
            RankTier::Challenger => "Challenger",
        }
    }

    /// Zero-based position on the ladder.
    #[must_use]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for RankTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A position on the rank ladder.
///
/// Ordering follows the ladder: tier first, then sub-tier. A bare top tier
/// (90-99 completions) sorts below any numbered sub-tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rank {
    pub tier: RankTier,
    /// Set only once the ladder is exhausted
    pub sub_tier: Option<usize>,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub_tier {
            Some(sub) => write!(f, "{} {}", self.tier, sub),
            None => write!(f, "{}", self.tier),
        }
    }
}

/// Map a completion count to its rank.
///
/// # Example
///
/// ```
/// use levelup::goals::rank::rank;
///
/// assert_eq!(rank(0).to_string(), "Iron");
/// assert_eq!(rank(23).to_string(), "Silver");
/// assert_eq!(rank(99).to_string(), "Challenger");
/// assert_eq!(rank(125).to_string(), "Challenger 3");
/// ```
#[must_use]
pub fn rank(count: usize) -> Rank {
    let tiers = RankTier::ALL.len();
    let ceiling = GOALS_PER_TIER * tiers;

    if count < ceiling {
        Rank {
            tier: RankTier::ALL[count / GOALS_PER_TIER],
            sub_tier: None,
        }
    } else {
        Rank {
            tier: RankTier::ALL[tiers - 1],
            sub_tier: Some((count - ceiling) / GOALS_PER_TIER + 1),
        }
    }
}

/// Fraction of the way to the next tier, in `[0, 1)`.
#[must_use]
pub fn progress_to_next(count: usize) -> f64 {
    (count % GOALS_PER_TIER) as f64 / GOALS_PER_TIER as f64
}

/// Count archive entries whose goal belongs to `category`.
#[must_use]
pub fn count_in_category(archive: &[CompletedGoal], category: &str) -> usize {
    archive.iter().filter(|c| c.category() == category).count()
}

/// Rank of `category`, counted over `archive`.
#[must_use]
pub fn rank_for_category(archive: &[CompletedGoal], category: &str) -> Rank {
    rank(count_in_category(archive, category))
}

/// Rank over every completed goal regardless of category.
#[must_use]
pub fn overall_rank(archive: &[CompletedGoal]) -> Rank {
    rank(archive.len())
}
