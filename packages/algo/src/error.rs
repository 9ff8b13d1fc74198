//! Scheduler error types

use thiserror::Error;

/// Reasons a review submission is rejected
///
/// Both are detected before any state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("invalid quality rating {0}: expected 0..=5")]
    InvalidQuality(i32),
    #[error("word is ignored by the learner; review not recorded")]
    StateIgnored,
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
