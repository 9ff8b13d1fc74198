//! Batch scheduling helpers
//!
//! Items in a batch belong to distinct learner × word pairs, so they are
//! independent and processed in parallel.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::SchedulerResult;
use crate::sm2::record_review;
use crate::types::LearnerWordState;

/// One review to apply in a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReviewItem {
    pub state: LearnerWordState,
    pub quality: i32,
}

/// Apply every review at `now`; results keep the input order.
pub fn apply_reviews(
    items: &[BatchReviewItem],
    now: DateTime<Utc>,
) -> Vec<SchedulerResult<LearnerWordState>> {
    items
        .par_iter()
        .map(|item| record_review(&item.state, item.quality, now))
        .collect()
}

/// Number of words falling due on each of the `days` days starting at `from`.
///
/// Bucket 0 also holds everything already overdue. Ignored words and words
/// due beyond the window are not counted.
pub fn forecast_due(states: &[LearnerWordState], from: DateTime<Utc>, days: usize) -> Vec<usize> {
    if days == 0 {
        return Vec::new();
    }

    states
        .par_iter()
        .filter(|state| !state.is_ignored())
        .fold(
            || vec![0usize; days],
            |mut buckets, state| {
                let offset = (state.next_review_at - from).num_days().max(0) as usize;
                if offset < days {
                    buckets[offset] += 1;
                }
                buckets
            },
        )
        .reduce(
            || vec![0usize; days],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x += y;
                }
                a
            },
        )
}
