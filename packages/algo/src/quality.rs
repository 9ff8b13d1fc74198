//! Quality ratings
//!
//! A quality rating is the learner's 0-5 recall grade for a single review:
//! - 0: complete blackout
//! - 1: incorrect, answer recognised once shown
//! - 2: incorrect, answer felt easy once shown
//! - 3: correct with serious difficulty
//! - 4: correct after hesitation
//! - 5: perfect, effortless recall

use serde::{Deserialize, Serialize};

use crate::error::{SchedulerError, SchedulerResult};
use crate::types::{ReviewButton, MAX_QUALITY, PASSING_QUALITY};

/// Answers faster than this are graded as effortless
const FAST_RESPONSE_MS: i64 = 2_000;

/// Answers faster than this are graded as hesitant
const NORMAL_RESPONSE_MS: i64 = 5_000;

/// Validated quality rating in `0..=5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const BLACKOUT: Quality = Quality(0);
    pub const PERFECT: Quality = Quality(MAX_QUALITY);

    /// Rejects anything outside `0..=5`; values are never clamped.
    pub fn new(value: i32) -> SchedulerResult<Self> {
        if (0..=MAX_QUALITY as i32).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(SchedulerError::InvalidQuality(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_passing(self) -> bool {
        self.0 >= PASSING_QUALITY
    }

    /// Grade a quiz answer from correctness and response latency.
    pub fn from_answer(is_correct: bool, response_time_ms: i64) -> Self {
        if !is_correct {
            return Self(1);
        }
        if response_time_ms < FAST_RESPONSE_MS {
            Self(5)
        } else if response_time_ms < NORMAL_RESPONSE_MS {
            Self(4)
        } else {
            Self(3)
        }
    }

    pub fn from_button(button: ReviewButton) -> Self {
        match button {
            ReviewButton::Again => Self(1),
            ReviewButton::Hard => Self(3),
            ReviewButton::Good => Self(4),
            ReviewButton::Easy => Self(5),
        }
    }
}

impl TryFrom<i32> for Quality {
    type Error = SchedulerError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Quality::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> Self {
        q.0
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
