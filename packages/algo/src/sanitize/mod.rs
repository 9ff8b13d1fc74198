use crate::sm2::{clamp_easiness, derive_status, is_learned};
use crate::types::{
    LearnerWordState, StateDiagnostics, WordStatus, INITIAL_EASINESS_FACTOR, MAX_INTERVAL_DAYS,
    MIN_EASINESS_FACTOR,
};

/// Check a state against the scheduler invariants without modifying it
pub fn validate_state(state: &LearnerWordState) -> StateDiagnostics {
    let mut violations = Vec::new();

    if !state.easiness_factor.is_finite() {
        violations.push(format!(
            "easiness factor is not finite: {}",
            state.easiness_factor
        ));
    } else if state.easiness_factor < MIN_EASINESS_FACTOR {
        violations.push(format!(
            "easiness factor {:.3} below floor {MIN_EASINESS_FACTOR}",
            state.easiness_factor
        ));
    }

    if state.interval_days == 0 {
        violations.push("interval is zero days".to_string());
    } else if state.interval_days > MAX_INTERVAL_DAYS {
        violations.push(format!(
            "interval {} exceeds {MAX_INTERVAL_DAYS} days",
            state.interval_days
        ));
    }

    if state.status == WordStatus::Learned
        && !is_learned(state.repetitions, state.easiness_factor)
    {
        violations.push(format!(
            "status learned with repetitions={} easiness={:.3}",
            state.repetitions, state.easiness_factor
        ));
    }

    if state.times_correct.saturating_add(state.times_incorrect) != state.times_reviewed {
        violations.push(format!(
            "counters disagree: correct={} incorrect={} reviewed={}",
            state.times_correct, state.times_incorrect, state.times_reviewed
        ));
    }

    StateDiagnostics {
        is_healthy: violations.is_empty(),
        violations,
    }
}

/// Repair a state loaded from storage; returns whether anything changed
///
/// Counter mismatches are reported by [`validate_state`] but left alone:
/// there is no way to tell which counter is wrong.
pub fn sanitize_state(state: &mut LearnerWordState) -> bool {
    let mut changed = false;

    if !state.easiness_factor.is_finite() {
        state.easiness_factor = INITIAL_EASINESS_FACTOR;
        changed = true;
    }
    let floored = clamp_easiness(state.easiness_factor);
    if floored != state.easiness_factor {
        state.easiness_factor = floored;
        changed = true;
    }

    let interval = state.interval_days.clamp(1, MAX_INTERVAL_DAYS);
    if interval != state.interval_days {
        state.interval_days = interval;
        changed = true;
    }

    if state.status == WordStatus::Learned
        && !is_learned(state.repetitions, state.easiness_factor)
    {
        state.status = derive_status(state.repetitions, state.easiness_factor);
        changed = true;
    }

    changed
}
