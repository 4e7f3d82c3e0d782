//! Exercise log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Training split a log belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyPart {
    Chest,
    Back,
    Legs,
    Shoulders,
    Rest,
}

impl BodyPart {
    /// Every body part, in display order.
    pub const ALL: [BodyPart; 5] = [
        BodyPart::Chest,
        BodyPart::Back,
        BodyPart::Legs,
        BodyPart::Shoulders,
        BodyPart::Rest,
    ];

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            BodyPart::Chest => "Chest",
            BodyPart::Back => "Back",
            BodyPart::Legs => "Legs",
            BodyPart::Shoulders => "Shoulders",
            BodyPart::Rest => "Rest",
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown body part.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown body part '{0}' (expected one of: chest, back, legs, shoulders, rest)")]
pub struct ParseBodyPartError(String);

impl FromStr for BodyPart {
    type Err = ParseBodyPartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BodyPart::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseBodyPartError(wanted.to_string()))
    }
}

/// Unique identifier for an exercise log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogId(Uuid);

impl LogId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LogId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LogId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// One set: weight lifted for some reps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedSet {
    pub id: Uuid,
    pub weight: u32,
    pub reps: u32,
}

impl LoggedSet {
    /// A set with nothing recorded yet.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            weight: 0,
            reps: 0,
        }
    }
}

/// Sets recorded for one exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub id: LogId,
    pub exercise_name: String,
    pub body_part: BodyPart,
    pub sets: Vec<LoggedSet>,
    pub date: DateTime<Utc>,
}

impl ExerciseLog {
    /// Total weight moved across all sets.
    #[must_use]
    pub fn volume(&self) -> u64 {
        self.sets
            .iter()
            .map(|s| u64::from(s.weight) * u64::from(s.reps))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_part_parse_case_insensitive() {
        assert_eq!("legs".parse::<BodyPart>().unwrap(), BodyPart::Legs);
        assert_eq!(" SHOULDERS ".parse::<BodyPart>().unwrap(), BodyPart::Shoulders);
        let err = "arms".parse::<BodyPart>().unwrap_err();
        assert!(err.to_string().contains("arms"));
    }

    #[test]
    fn test_volume() {
        let log = ExerciseLog {
            id: LogId::new(),
            exercise_name: "Squats".into(),
            body_part: BodyPart::Legs,
            sets: vec![
                LoggedSet { id: Uuid::new_v4(), weight: 225, reps: 5 },
                LoggedSet { id: Uuid::new_v4(), weight: 245, reps: 3 },
                LoggedSet::empty(),
            ],
            date: Utc::now(),
        };
        assert_eq!(log.volume(), 225 * 5 + 245 * 3);
    }
}
