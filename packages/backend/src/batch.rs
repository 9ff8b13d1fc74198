//! Offline replay of review submissions
//!
//! Input is a JSON document of the form
//! `{ "reviews": [{ "userId", "wordId", "quality", "reviewedAt" }] }`.
//! Reviews are applied in file order.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::services::progress::{
    xp_for_review, LearnerProgress, XpTransaction, XpTransactionKind,
};
use crate::services::review::{ReviewError, ReviewService};
use crate::services::vocabulary_stats::VocabularyStats;
use crate::store::WordStateStore;

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid batch json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Review(#[from] ReviewError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub user_id: String,
    pub word_id: String,
    pub quality: i32,
    pub reviewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewBatch {
    pub reviews: Vec<ReviewSubmission>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub stats: VocabularyStats,
    pub progress: LearnerProgress,
    pub due_words: usize,
    pub xp_transactions: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: usize,
    pub users: BTreeMap<String, UserSummary>,
}

pub fn parse_review_batch(text: &str) -> Result<ReviewBatch, BatchError> {
    Ok(serde_json::from_str(text)?)
}

pub fn load_review_batch(path: &Path) -> Result<ReviewBatch, BatchError> {
    let text = std::fs::read_to_string(path).map_err(|source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_review_batch(&text)
}

/// Apply every submission and summarise each learner as of `as_of`.
///
/// Rejected submissions are counted and logged; they never abort the replay.
pub fn replay<S: WordStateStore>(
    service: &ReviewService<S>,
    batch: &ReviewBatch,
    config: &Config,
    as_of: DateTime<Utc>,
) -> Result<ReplaySummary, BatchError> {
    let mut summary = ReplaySummary::default();
    let mut progress: HashMap<String, (LearnerProgress, Vec<XpTransaction>)> = HashMap::new();

    for review in &batch.reviews {
        let entry = progress.entry(review.user_id.clone()).or_default();
        match service.submit_review(
            &review.user_id,
            &review.word_id,
            review.quality,
            review.reviewed_at,
        ) {
            Ok(outcome) => {
                summary.applied += 1;
                let (learner, ledger) = entry;
                learner.update_streak(review.reviewed_at.date_naive());

                let xp = xp_for_review(outcome.quality, outcome.newly_learned, &config.rewards);
                if xp > 0 {
                    let tx = XpTransaction::new(
                        xp,
                        XpTransactionKind::Review,
                        format!("review of {}", review.word_id),
                        review.reviewed_at,
                    );
                    learner.apply_transaction(ledger, tx);
                }
            }
            Err(err) => {
                summary.rejected += 1;
                tracing::warn!(
                    user_id = %review.user_id,
                    word_id = %review.word_id,
                    quality = review.quality,
                    error = %err,
                    "review rejected"
                );
            }
        }
    }

    for (user_id, (learner, ledger)) in progress {
        let states = service.states_for_user(&user_id)?;
        let due = service.due_words(&user_id, as_of, config.daily_review_limit)?;
        summary.users.insert(
            user_id,
            UserSummary {
                stats: VocabularyStats::from_states(&states, as_of),
                progress: learner,
                due_words: due.len(),
                xp_transactions: ledger.len(),
            },
        );
    }

    tracing::info!(
        applied = summary.applied,
        rejected = summary.rejected,
        users = summary.users.len(),
        "batch replay finished"
    );
    Ok(summary)
}
