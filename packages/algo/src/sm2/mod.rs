//! SM-2 Spaced Repetition Scheduler
//!
//! Given a learner's memory-strength state for one word and the quality of
//! their latest recall, compute the next review interval and update the
//! easiness factor, status and counters.
//!
//! Update rules:
//! - Success (q >= 3):
//!   - interval = 1 (first), 6 (second), round(interval * EF) afterwards
//!   - EF' = EF + 0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)
//! - Failure (q < 3): repetitions and interval reset, EF' = EF - 0.2
//! - EF is floored at 1.3 on every path
//! - status: learned if repetitions >= 5 and EF >= 2.5, else review if
//!   repetitions > 0, else learning
//!
//! Rounding is half away from zero (`f64::round`).
//!
//! Every function here is pure: the caller supplies `now` and persists the
//! returned state.

use chrono::{DateTime, Duration, Utc};

use crate::error::{SchedulerError, SchedulerResult};
use crate::quality::Quality;
use crate::types::{
    LearnerWordState, ReviewButton, ReviewPreview, WordStatus, FAILURE_EASINESS_PENALTY,
    FIRST_INTERVAL_DAYS, LEARNED_MIN_EASINESS, LEARNED_MIN_REPETITIONS, MAX_INTERVAL_DAYS,
    MAX_QUALITY, MIN_EASINESS_FACTOR, SECOND_INTERVAL_DAYS,
};

// ==================== Core Update ====================

/// Record one review with a raw integer rating.
///
/// Fails with [`SchedulerError::InvalidQuality`] for ratings outside `0..=5`
/// and with [`SchedulerError::StateIgnored`] for ignored words. The input
/// state is never modified.
pub fn record_review(
    state: &LearnerWordState,
    quality: i32,
    now: DateTime<Utc>,
) -> SchedulerResult<LearnerWordState> {
    let quality = Quality::new(quality)?;
    record_quality(state, quality, now)
}

/// Record one review with an already validated rating.
pub fn record_quality(
    state: &LearnerWordState,
    quality: Quality,
    now: DateTime<Utc>,
) -> SchedulerResult<LearnerWordState> {
    if state.is_ignored() {
        return Err(SchedulerError::StateIgnored);
    }

    let mut next = state.clone();
    next.interval_days = next_interval(state, quality);

    if quality.is_passing() {
        next.repetitions = state.repetitions.saturating_add(1);
        next.current_streak = state.current_streak.saturating_add(1);
        next.times_correct = state.times_correct.saturating_add(1);
    } else {
        next.repetitions = 0;
        next.current_streak = 0;
        next.times_incorrect = state.times_incorrect.saturating_add(1);
    }
    next.easiness_factor = next_easiness(state.easiness_factor, quality);

    next.next_review_at = add_days(now, next.interval_days);
    next.last_reviewed_at = Some(now);
    next.last_response_quality = Some(quality.value());
    next.times_reviewed = state.times_reviewed.saturating_add(1);

    next.status = derive_status(next.repetitions, next.easiness_factor);
    if next.status == WordStatus::Learned && next.learned_at.is_none() {
        next.learned_at = Some(now);
    }

    Ok(next)
}

/// Move a word to `ignored`; it stays stored but is never scheduled again.
pub fn ignore(state: &LearnerWordState) -> LearnerWordState {
    LearnerWordState {
        status: WordStatus::Ignored,
        ..state.clone()
    }
}

// ==================== Building Blocks ====================

/// The single easiness floor, applied after every adjustment.
pub fn clamp_easiness(easiness: f64) -> f64 {
    easiness.max(MIN_EASINESS_FACTOR)
}

/// Easiness factor after a review of the given quality.
pub fn next_easiness(easiness: f64, quality: Quality) -> f64 {
    if quality.is_passing() {
        let miss = (MAX_QUALITY - quality.value()) as f64;
        clamp_easiness(easiness + 0.1 - miss * (0.08 + miss * 0.02))
    } else {
        clamp_easiness(easiness - FAILURE_EASINESS_PENALTY)
    }
}

/// Interval (days) scheduled by a review of the given quality.
pub fn next_interval(state: &LearnerWordState, quality: Quality) -> u32 {
    if !quality.is_passing() {
        return FIRST_INTERVAL_DAYS;
    }
    match state.repetitions {
        0 => FIRST_INTERVAL_DAYS,
        1 => SECOND_INTERVAL_DAYS,
        _ => {
            let grown = (state.interval_days as f64 * state.easiness_factor).round();
            // corrupted easiness restarts the ladder
            if grown.is_nan() {
                return FIRST_INTERVAL_DAYS;
            }
            grown.clamp(1.0, MAX_INTERVAL_DAYS as f64) as u32
        }
    }
}

/// Status as a pure function of repetitions and easiness.
pub fn derive_status(repetitions: u32, easiness: f64) -> WordStatus {
    if is_learned(repetitions, easiness) {
        WordStatus::Learned
    } else if repetitions > 0 {
        WordStatus::Review
    } else {
        WordStatus::Learning
    }
}

pub fn is_learned(repetitions: u32, easiness: f64) -> bool {
    repetitions >= LEARNED_MIN_REPETITIONS && easiness >= LEARNED_MIN_EASINESS
}

/// Interval each answer button would schedule, without recording anything.
pub fn preview_intervals(state: &LearnerWordState) -> ReviewPreview {
    let [again, hard, good, easy] =
        ReviewButton::ALL.map(|button| next_interval(state, Quality::from_button(button)));
    ReviewPreview {
        again_days: again,
        hard_days: hard,
        good_days: good,
        easy_days: easy,
    }
}

/// Saturates at `DateTime::<Utc>::MAX_UTC` when `now + days` is not
/// representable, so `next_review_at == now + interval` only holds for
/// review times at least `MAX_INTERVAL_DAYS` before that bound.
fn add_days(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(days as i64))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
