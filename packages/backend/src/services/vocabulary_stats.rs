use chrono::{DateTime, Duration, Utc};
use eit_algo::{LearnerWordState, WordStatus};
use serde::{Deserialize, Serialize};

/// Vocabulary progress summary for one learner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyStats {
    pub total_words: usize,
    pub new_words: usize,
    pub learning_words: usize,
    pub review_words: usize,
    pub learned_words: usize,
    pub ignored_words: usize,
    /// Due at the time of computation
    pub due_now: usize,
    /// Due for more than a day
    pub overdue: usize,
    pub total_reviews: u64,
    pub total_correct: u64,
    pub accuracy_rate: f64,
    /// Mean easiness of reviewed, non-ignored words
    pub avg_easiness: f64,
    pub best_streak: u32,
}

impl VocabularyStats {
    pub fn from_states<'a>(
        states: impl IntoIterator<Item = &'a LearnerWordState>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut stats = Self::default();
        let mut easiness_sum = 0.0;
        let mut easiness_count = 0usize;
        let overdue_cutoff = now - Duration::days(1);

        for state in states {
            stats.total_words += 1;
            match state.status {
                WordStatus::New => stats.new_words += 1,
                WordStatus::Learning => stats.learning_words += 1,
                WordStatus::Review => stats.review_words += 1,
                WordStatus::Learned => stats.learned_words += 1,
                WordStatus::Ignored => stats.ignored_words += 1,
            }

            if state.is_due(now) {
                stats.due_now += 1;
                if state.next_review_at < overdue_cutoff {
                    stats.overdue += 1;
                }
            }

            stats.total_reviews += state.times_reviewed as u64;
            stats.total_correct += state.times_correct as u64;
            stats.best_streak = stats.best_streak.max(state.current_streak);

            if state.times_reviewed > 0 && !state.is_ignored() {
                easiness_sum += state.easiness_factor;
                easiness_count += 1;
            }
        }

        if stats.total_reviews > 0 {
            stats.accuracy_rate = stats.total_correct as f64 / stats.total_reviews as f64;
        }
        if easiness_count > 0 {
            stats.avg_easiness = easiness_sum / easiness_count as f64;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use eit_algo::{ignore, record_review};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_empty() {
        let none: Vec<LearnerWordState> = Vec::new();
        let stats = VocabularyStats::from_states(&none, t0());
        assert_eq!(stats, VocabularyStats::default());
    }

    #[test]
    fn test_counts_by_status_and_due() {
        let fresh = LearnerWordState::new(t0());
        let reviewed = record_review(&fresh, 5, t0() - Duration::days(5)).unwrap();
        let failed = record_review(&fresh, 1, t0()).unwrap();
        let ignored = ignore(&reviewed);

        let states = vec![fresh, reviewed, failed, ignored];
        let stats = VocabularyStats::from_states(&states, t0());

        assert_eq!(stats.total_words, 4);
        assert_eq!(stats.new_words, 1);
        assert_eq!(stats.review_words, 1);
        assert_eq!(stats.learning_words, 1);
        assert_eq!(stats.ignored_words, 1);
        // fresh is due now; reviewed fell due four days ago
        assert_eq!(stats.due_now, 2);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.total_reviews, 3);
        assert_eq!(stats.total_correct, 2);
        assert!((stats.accuracy_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!((stats.avg_easiness - (2.6 + 2.3) / 2.0).abs() < 1e-9);
        assert_eq!(stats.best_streak, 1);
    }
}
