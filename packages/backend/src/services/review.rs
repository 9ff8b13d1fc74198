use std::sync::Arc;

use chrono::{DateTime, Utc};
use eit_algo::{
    ignore, preview_intervals, record_quality, LearnerWordState, Quality, ReviewPreview,
    SchedulerError, WordStatus,
};
use serde::Serialize;

use crate::store::{StoreError, VersionedState, WordKey, WordStateStore};

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("gave up on {key} after {attempts} conflicting writes")]
    Contention { key: WordKey, attempts: u32 },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub state: LearnerWordState,
    pub version: u64,
    pub quality: Quality,
    /// The word entered `learned` with this review
    pub newly_learned: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueWord {
    pub word_id: String,
    pub state: LearnerWordState,
}

pub struct ReviewService<S: WordStateStore> {
    store: Arc<S>,
    max_cas_retries: u32,
}

impl<S: WordStateStore> Clone for ReviewService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            max_cas_retries: self.max_cas_retries,
        }
    }
}

impl<S: WordStateStore> ReviewService<S> {
    pub fn new(store: Arc<S>, max_cas_retries: u32) -> Self {
        Self {
            store,
            max_cas_retries,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a learner's first exposure to a word. Returns the existing
    /// state when the word is already tracked.
    pub fn start_tracking(
        &self,
        user_id: &str,
        word_id: &str,
        now: DateTime<Utc>,
    ) -> Result<VersionedState, ReviewError> {
        let key = WordKey::new(user_id, word_id);
        self.load_or_create(&key, now)
    }

    pub fn submit_review(
        &self,
        user_id: &str,
        word_id: &str,
        quality: i32,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome, ReviewError> {
        let key = WordKey::new(user_id, word_id);
        let quality = Quality::new(quality).map_err(|err| {
            tracing::debug!(%key, quality, error = %err, "review rejected");
            err
        })?;
        let mut attempts = 0;

        loop {
            let current = self.load_or_create(&key, now)?;
            let next = record_quality(&current.state, quality, now).map_err(|err| {
                tracing::debug!(%key, %quality, error = %err, "review rejected");
                err
            })?;
            let newly_learned =
                next.status == WordStatus::Learned && current.state.status != WordStatus::Learned;

            match self.store.compare_and_swap(&key, current.version, next) {
                Ok(stored) => {
                    tracing::debug!(
                        %key,
                        %quality,
                        interval_days = stored.state.interval_days,
                        easiness = stored.state.easiness_factor,
                        status = %stored.state.status,
                        "review recorded"
                    );
                    if newly_learned {
                        tracing::info!(%key, "word learned");
                    }
                    return Ok(ReviewOutcome {
                        state: stored.state,
                        version: stored.version,
                        quality,
                        newly_learned,
                    });
                }
                Err(StoreError::VersionConflict { expected, actual, .. }) => {
                    attempts += 1;
                    tracing::warn!(%key, expected, actual, attempts, "concurrent review, retrying");
                    if attempts > self.max_cas_retries {
                        return Err(ReviewError::Contention { key, attempts });
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Stop scheduling a word for this learner; its history is kept.
    pub fn ignore_word(
        &self,
        user_id: &str,
        word_id: &str,
        now: DateTime<Utc>,
    ) -> Result<VersionedState, ReviewError> {
        let key = WordKey::new(user_id, word_id);
        let mut attempts = 0;

        loop {
            let current = self.load_or_create(&key, now)?;
            if current.state.is_ignored() {
                return Ok(current);
            }
            match self
                .store
                .compare_and_swap(&key, current.version, ignore(&current.state))
            {
                Ok(stored) => {
                    tracing::info!(%key, "word ignored");
                    return Ok(stored);
                }
                Err(StoreError::VersionConflict { .. }) => {
                    attempts += 1;
                    if attempts > self.max_cas_retries {
                        return Err(ReviewError::Contention { key, attempts });
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Words due at `now`, most overdue first.
    pub fn due_words(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<DueWord>, ReviewError> {
        let mut due: Vec<DueWord> = self
            .store
            .list_for_user(user_id)?
            .into_iter()
            .filter(|(_, stored)| stored.state.is_due(now))
            .map(|(word_id, stored)| DueWord {
                word_id,
                state: stored.state,
            })
            .collect();

        due.sort_by(|a, b| {
            a.state
                .next_review_at
                .cmp(&b.state.next_review_at)
                .then_with(|| a.word_id.cmp(&b.word_id))
        });
        due.truncate(limit);
        Ok(due)
    }

    /// Intervals each answer button would schedule. Ignored words have none.
    pub fn preview(&self, user_id: &str, word_id: &str) -> Result<ReviewPreview, ReviewError> {
        let key = WordKey::new(user_id, word_id);
        let stored = self
            .store
            .get(&key)?
            .ok_or(StoreError::NotFound(key))?;
        if stored.state.is_ignored() {
            return Err(SchedulerError::StateIgnored.into());
        }
        Ok(preview_intervals(&stored.state))
    }

    pub fn states_for_user(&self, user_id: &str) -> Result<Vec<LearnerWordState>, ReviewError> {
        Ok(self
            .store
            .list_for_user(user_id)?
            .into_iter()
            .map(|(_, stored)| stored.state)
            .collect())
    }

    fn load_or_create(
        &self,
        key: &WordKey,
        now: DateTime<Utc>,
    ) -> Result<VersionedState, ReviewError> {
        if let Some(stored) = self.store.get(key)? {
            return Ok(stored);
        }
        match self.store.insert(key, LearnerWordState::new(now)) {
            Ok(stored) => {
                tracing::debug!(%key, "started tracking word");
                Ok(stored)
            }
            // Another writer created it between our read and insert.
            Err(StoreError::AlreadyExists(_)) => self
                .store
                .get(key)?
                .ok_or_else(|| StoreError::NotFound(key.clone()).into()),
            Err(err) => Err(err.into()),
        }
    }
}
