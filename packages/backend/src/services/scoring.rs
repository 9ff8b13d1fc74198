use serde::{Deserialize, Serialize};

use crate::config::RewardConfig;

/// Share of correct answers for a question, in percent; 0 when never used.
pub fn success_rate(times_used: u32, times_correct: u32) -> f64 {
    if times_used == 0 {
        return 0.0;
    }
    times_correct as f64 / times_used as f64 * 100.0
}

pub fn is_passing(score: u32, passing_score: u32) -> bool {
    score >= passing_score
}

/// Integer mean of the rubric scores that have been graded.
pub fn writing_overall_score(scores: &[Option<u32>]) -> Option<u32> {
    let graded: Vec<u32> = scores.iter().flatten().copied().collect();
    if graded.is_empty() {
        return None;
    }
    Some(graded.iter().sum::<u32>() / graded.len() as u32)
}

/// Estimated days to finish a course at half an hour per day.
pub fn course_completion_days(duration_hours: u32) -> u32 {
    duration_hours.saturating_mul(2).max(1)
}

/// Result tally of one vocabulary quiz
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizTally {
    pub total_questions: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub skipped: u32,
}

impl QuizTally {
    pub fn new(total_questions: u32) -> Self {
        Self {
            total_questions,
            ..Self::default()
        }
    }

    pub fn record(&mut self, answer: Option<bool>) {
        match answer {
            Some(true) => self.correct += 1,
            Some(false) => self.incorrect += 1,
            None => self.skipped += 1,
        }
    }

    pub fn answered(&self) -> u32 {
        self.correct + self.incorrect + self.skipped
    }

    /// Correct answers over all questions, in percent with two decimals.
    pub fn accuracy_percentage(&self) -> Option<f64> {
        if self.total_questions == 0 {
            return None;
        }
        let raw = self.correct as f64 / self.total_questions as f64 * 100.0;
        Some((raw * 100.0).round() / 100.0)
    }

    /// One review's worth of XP per correct answer, plus a lesson's worth for a perfect run.
    pub fn xp_earned(&self, rewards: &RewardConfig) -> i64 {
        let base = self.correct as i64 * rewards.xp_per_review;
        if self.total_questions > 0 && self.correct == self.total_questions {
            base + rewards.xp_per_lesson
        } else {
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        assert_eq!(success_rate(0, 0), 0.0);
        assert_eq!(success_rate(4, 3), 75.0);
    }

    #[test]
    fn test_passing() {
        assert!(is_passing(70, 70));
        assert!(!is_passing(69, 70));
    }

    #[test]
    fn test_writing_overall_score() {
        assert_eq!(writing_overall_score(&[None, None]), None);
        assert_eq!(
            writing_overall_score(&[Some(80), None, Some(75), Some(90)]),
            Some(81)
        );
    }

    #[test]
    fn test_course_completion_days() {
        assert_eq!(course_completion_days(0), 1);
        assert_eq!(course_completion_days(12), 24);
    }

    #[test]
    fn test_quiz_tally() {
        let mut tally = QuizTally::new(3);
        tally.record(Some(true));
        tally.record(Some(false));
        tally.record(None);
        assert_eq!(tally.answered(), 3);
        assert_eq!(tally.accuracy_percentage(), Some(33.33));
        assert_eq!(tally.xp_earned(&RewardConfig::default()), 2);
    }

    #[test]
    fn test_perfect_quiz_bonus() {
        let mut tally = QuizTally::new(2);
        tally.record(Some(true));
        tally.record(Some(true));
        assert_eq!(tally.accuracy_percentage(), Some(100.0));
        assert_eq!(tally.xp_earned(&RewardConfig::default()), 14);
    }

    #[test]
    fn test_empty_quiz() {
        let tally = QuizTally::new(0);
        assert_eq!(tally.accuracy_percentage(), None);
        assert_eq!(tally.xp_earned(&RewardConfig::default()), 0);
    }
}
