//! Shared vocabulary for the curriculum engine.
//!
//! Difficulty and progress status are stored as text in the database but handled
//! as closed enums here. Unrecognized difficulty text maps to `Unknown`, which
//! carries zero ranking weight, so content typos degrade a word's priority
//! instead of breaking recommendation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Unknown,
}

impl Difficulty {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "beginner" => Difficulty::Beginner,
            "intermediate" => Difficulty::Intermediate,
            "advanced" => Difficulty::Advanced,
            _ => Difficulty::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Unknown => "unknown",
        }
    }

    /// Base ranking weight. Beginner words dominate unless an unlock-count
    /// differential overcomes the tier gap.
    pub fn weight(&self) -> i64 {
        match self {
            Difficulty::Beginner => 100,
            Difficulty::Intermediate => 50,
            Difficulty::Advanced => 10,
            Difficulty::Unknown => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Locked,
    Unlocked,
    InProgress,
    Practicing,
    Mastered,
}

impl ProgressStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "locked" => Some(ProgressStatus::Locked),
            "unlocked" => Some(ProgressStatus::Unlocked),
            "in_progress" => Some(ProgressStatus::InProgress),
            "practicing" => Some(ProgressStatus::Practicing),
            "mastered" => Some(ProgressStatus::Mastered),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::Locked => "locked",
            ProgressStatus::Unlocked => "unlocked",
            ProgressStatus::InProgress => "in_progress",
            ProgressStatus::Practicing => "practicing",
            ProgressStatus::Mastered => "mastered",
        }
    }

    pub fn is_mastered(&self) -> bool {
        matches!(self, ProgressStatus::Mastered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse_lenient() {
        assert_eq!(Difficulty::parse("beginner"), Difficulty::Beginner);
        assert_eq!(Difficulty::parse(" Advanced "), Difficulty::Advanced);
        assert_eq!(Difficulty::parse("expert"), Difficulty::Unknown);
        assert_eq!(Difficulty::parse(""), Difficulty::Unknown);
    }

    #[test]
    fn test_difficulty_weights() {
        assert_eq!(Difficulty::Beginner.weight(), 100);
        assert_eq!(Difficulty::Intermediate.weight(), 50);
        assert_eq!(Difficulty::Advanced.weight(), 10);
        assert_eq!(Difficulty::Unknown.weight(), 0);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            ProgressStatus::Locked,
            ProgressStatus::Unlocked,
            ProgressStatus::InProgress,
            ProgressStatus::Practicing,
            ProgressStatus::Mastered,
        ] {
            assert_eq!(ProgressStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ProgressStatus::parse("paused"), None);
    }
}
