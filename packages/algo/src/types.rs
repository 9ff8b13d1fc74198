//! Common Types and Constants
//!
//! Shared data structures used across all algorithm modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Lower bound of the easiness factor
pub const MIN_EASINESS_FACTOR: f64 = 1.3;

/// Easiness factor of a freshly tracked word
pub const INITIAL_EASINESS_FACTOR: f64 = 2.5;

/// Lowest quality that counts as a successful recall
pub const PASSING_QUALITY: u8 = 3;

/// Highest quality rating
pub const MAX_QUALITY: u8 = 5;

/// Repetitions required before a word can be marked learned
pub const LEARNED_MIN_REPETITIONS: u32 = 5;

/// Easiness required before a word can be marked learned
pub const LEARNED_MIN_EASINESS: f64 = 2.5;

/// Interval after the first successful review (days)
pub const FIRST_INTERVAL_DAYS: u32 = 1;

/// Interval after the second successful review (days)
pub const SECOND_INTERVAL_DAYS: u32 = 6;

/// Interval ceiling (days); keeps due dates representable
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Easiness penalty applied on a failed review
pub const FAILURE_EASINESS_PENALTY: f64 = 0.2;

// ==================== Word Status ====================

/// Learning status of one learner × word pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    New,
    Learning,
    Review,
    Learned,
    Ignored,
}

impl WordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WordStatus::New => "new",
            WordStatus::Learning => "learning",
            WordStatus::Review => "review",
            WordStatus::Learned => "learned",
            WordStatus::Ignored => "ignored",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "new" => Some(WordStatus::New),
            "learning" => Some(WordStatus::Learning),
            "review" => Some(WordStatus::Review),
            "learned" => Some(WordStatus::Learned),
            "ignored" => Some(WordStatus::Ignored),
            _ => None,
        }
    }
}

impl std::fmt::Display for WordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Learner Word State ====================

/// Memory-strength state of one learner for one vocabulary item
///
/// Mutated only through [`crate::sm2::record_review`] and
/// [`crate::sm2::ignore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerWordState {
    /// Consecutive successful reviews since the last failure
    pub repetitions: u32,
    /// Interval growth multiplier, never below [`MIN_EASINESS_FACTOR`]
    pub easiness_factor: f64,
    /// Days until the next scheduled review
    pub interval_days: u32,
    /// Earliest time the word should be presented again
    pub next_review_at: DateTime<Utc>,
    pub status: WordStatus,
    pub times_reviewed: u32,
    pub times_correct: u32,
    pub times_incorrect: u32,
    pub current_streak: u32,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// Set once, on the first transition into `learned`
    pub learned_at: Option<DateTime<Utc>>,
    pub last_response_quality: Option<u8>,
}

impl LearnerWordState {
    /// State for a learner's first exposure to a word
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            repetitions: 0,
            easiness_factor: INITIAL_EASINESS_FACTOR,
            interval_days: FIRST_INTERVAL_DAYS,
            next_review_at: now,
            status: WordStatus::New,
            times_reviewed: 0,
            times_correct: 0,
            times_incorrect: 0,
            current_streak: 0,
            last_reviewed_at: None,
            learned_at: None,
            last_response_quality: None,
        }
    }

    pub fn is_ignored(&self) -> bool {
        self.status == WordStatus::Ignored
    }

    pub fn is_learned(&self) -> bool {
        self.status == WordStatus::Learned
    }

    /// Whether the word should be presented at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.is_ignored() && self.next_review_at <= now
    }

    /// Share of correct reviews in [0, 1]
    pub fn accuracy(&self) -> f64 {
        if self.times_reviewed == 0 {
            return 0.0;
        }
        self.times_correct as f64 / self.times_reviewed as f64
    }
}

// ==================== Review Preview ====================

/// Four-button answer scale shown to learners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewButton {
    Again,
    Hard,
    Good,
    Easy,
}

impl ReviewButton {
    pub const ALL: [ReviewButton; 4] = [
        ReviewButton::Again,
        ReviewButton::Hard,
        ReviewButton::Good,
        ReviewButton::Easy,
    ];
}

/// Interval (days) each button would produce for a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPreview {
    pub again_days: u32,
    pub hard_days: u32,
    pub good_days: u32,
    pub easy_days: u32,
}

// ==================== Diagnostics ====================

/// Invariant check result for a stored state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDiagnostics {
    pub is_healthy: bool,
    pub violations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_new_state_defaults() {
        let state = LearnerWordState::new(t0());
        assert_eq!(state.repetitions, 0);
        assert_eq!(state.easiness_factor, INITIAL_EASINESS_FACTOR);
        assert_eq!(state.interval_days, 1);
        assert_eq!(state.status, WordStatus::New);
        assert_eq!(state.next_review_at, t0());
        assert!(state.last_reviewed_at.is_none());
        assert!(state.learned_at.is_none());
    }

    #[test]
    fn test_new_state_is_due_immediately() {
        let state = LearnerWordState::new(t0());
        assert!(state.is_due(t0()));
    }

    #[test]
    fn test_ignored_state_is_never_due() {
        let mut state = LearnerWordState::new(t0());
        state.status = WordStatus::Ignored;
        assert!(!state.is_due(t0() + chrono::Duration::days(400)));
    }

    #[test]
    fn test_accuracy_without_reviews() {
        assert_eq!(LearnerWordState::new(t0()).accuracy(), 0.0);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&WordStatus::Learned).unwrap();
        assert_eq!(json, "\"learned\"");
        assert_eq!(WordStatus::parse("REVIEW"), Some(WordStatus::Review));
        assert_eq!(WordStatus::parse("relearning"), None);
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let value = serde_json::to_value(LearnerWordState::new(t0())).unwrap();
        assert!(value.get("easinessFactor").is_some());
        assert!(value.get("nextReviewAt").is_some());
        assert_eq!(value["status"], "new");
    }
}
