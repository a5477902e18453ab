//! Mastery state machine for one (child, word) pair.
//!
//! Pure: takes the current record and an attempt outcome, returns the updated
//! record. The caller owns persistence and supplies the clock, so replaying a
//! full attempt log through `apply_attempt` always reproduces the same final
//! state.

use chrono::NaiveDateTime;

use crate::core::types::ProgressStatus;

/// Minimum attempts before accuracy is trusted for a mastery judgment.
pub const MIN_ATTEMPTS: i32 = 3;
/// Accuracy at or above which a word counts as mastered.
pub const MASTERY_ACCURACY: f64 = 0.8;
/// Accuracy band that, combined with a short streak, counts as practicing.
pub const PRACTICING_ACCURACY: f64 = 0.6;
/// Consecutive correct answers required for practicing.
pub const PRACTICING_STREAK: i32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    pub status: ProgressStatus,
    pub attempts: i32,
    pub correct_count: i32,
    pub streak_count: i32,
    pub last_practiced_at: Option<NaiveDateTime>,
    pub mastered_at: Option<NaiveDateTime>,
}

impl ProgressState {
    /// Fresh record for a word being attempted the first time. Eligibility has
    /// already been confirmed by the caller, so it starts unlocked.
    pub fn new_unlocked() -> Self {
        Self {
            status: ProgressStatus::Unlocked,
            attempts: 0,
            correct_count: 0,
            streak_count: 0,
            last_practiced_at: None,
            mastered_at: None,
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.attempts <= 0 {
            0.0
        } else {
            self.correct_count as f64 / self.attempts as f64
        }
    }
}

/// Applies one practice attempt and derives the new status.
///
/// `Mastered` is terminal: counters and `last_practiced_at` keep updating, but
/// the status never downgrades and `mastered_at` is written exactly once.
pub fn apply_attempt(
    record: Option<ProgressState>,
    correct: bool,
    now: NaiveDateTime,
) -> ProgressState {
    let mut record = record.unwrap_or_else(ProgressState::new_unlocked);

    record.attempts += 1;
    if correct {
        record.correct_count += 1;
        record.streak_count += 1;
    } else {
        record.streak_count = 0;
    }
    record.last_practiced_at = Some(now);

    if record.status.is_mastered() {
        return record;
    }

    record.status = if record.attempts < MIN_ATTEMPTS {
        ProgressStatus::InProgress
    } else {
        let accuracy = record.accuracy();
        if accuracy >= MASTERY_ACCURACY {
            if record.mastered_at.is_none() {
                record.mastered_at = Some(now);
            }
            ProgressStatus::Mastered
        } else if accuracy >= PRACTICING_ACCURACY && record.streak_count >= PRACTICING_STREAK {
            ProgressStatus::Practicing
        } else {
            ProgressStatus::InProgress
        }
    };

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, minute, 0)
            .unwrap()
    }

    fn replay(outcomes: &[bool]) -> ProgressState {
        let mut record = None;
        for (i, &correct) in outcomes.iter().enumerate() {
            record = Some(apply_attempt(record, correct, at(i as u32)));
        }
        record.unwrap()
    }

    #[test]
    fn test_first_attempt_creates_record() {
        let record = apply_attempt(None, true, at(0));
        assert_eq!(record.attempts, 1);
        assert_eq!(record.correct_count, 1);
        assert_eq!(record.streak_count, 1);
        assert_eq!(record.status, ProgressStatus::InProgress);
        assert_eq!(record.last_practiced_at, Some(at(0)));
        assert_eq!(record.mastered_at, None);
    }

    #[test]
    fn test_two_correct_still_in_progress() {
        // Under the minimum sample size, even perfect accuracy is in_progress.
        let record = replay(&[true, true]);
        assert_eq!(record.status, ProgressStatus::InProgress);
    }

    #[test]
    fn test_failure_resets_streak() {
        let record = replay(&[true, true, false]);
        assert_eq!(record.streak_count, 0);
        assert_eq!(record.correct_count, 2);
        assert_eq!(record.attempts, 3);
    }

    #[test]
    fn test_four_of_five_is_mastered() {
        let record = replay(&[true, true, false, true, true]);
        assert!((record.accuracy() - 0.8).abs() < f64::EPSILON);
        assert_eq!(record.status, ProgressStatus::Mastered);
        assert_eq!(record.mastered_at, Some(at(4)));
    }

    #[test]
    fn test_three_of_five_with_streak_is_practicing() {
        let record = replay(&[false, false, true, true, true]);
        assert!((record.accuracy() - 0.6).abs() < f64::EPSILON);
        assert_eq!(record.streak_count, 3);
        assert_eq!(record.status, ProgressStatus::Practicing);
    }

    #[test]
    fn test_accuracy_band_without_streak_is_in_progress() {
        // 3/5 correct but the run ends on a failure: no streak, no practicing.
        let record = replay(&[true, true, true, false, false]);
        assert!((record.accuracy() - 0.6).abs() < f64::EPSILON);
        assert_eq!(record.status, ProgressStatus::InProgress);
    }

    #[test]
    fn test_mastered_is_terminal() {
        let mastered = replay(&[true, true, true]);
        assert_eq!(mastered.status, ProgressStatus::Mastered);
        let first_mastered_at = mastered.mastered_at;

        // A long run of failures keeps counters honest but never downgrades.
        let mut record = mastered;
        for i in 0..10 {
            record = apply_attempt(Some(record), false, at(10 + i));
        }
        assert_eq!(record.status, ProgressStatus::Mastered);
        assert_eq!(record.mastered_at, first_mastered_at);
        assert_eq!(record.attempts, 13);
        assert_eq!(record.streak_count, 0);
    }

    #[test]
    fn test_replay_matches_aggregates() {
        let outcomes = [true, false, true, true, false, true, true, true];
        let record = replay(&outcomes);
        assert_eq!(record.attempts, outcomes.len() as i32);
        assert_eq!(
            record.correct_count,
            outcomes.iter().filter(|&&c| c).count() as i32
        );
        let trailing_streak = outcomes.iter().rev().take_while(|&&c| c).count() as i32;
        assert_eq!(record.streak_count, trailing_streak);
    }
}
