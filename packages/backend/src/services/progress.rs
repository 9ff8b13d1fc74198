use chrono::{DateTime, NaiveDate, Utc};
use eit_algo::Quality;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RewardConfig;

const STARTING_COINS: i64 = 100;

/// CEFR proficiency levels, ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    /// XP needed to hold this level
    pub fn xp_threshold(self) -> i64 {
        match self {
            CefrLevel::A1 => 0,
            CefrLevel::A2 => 1_000,
            CefrLevel::B1 => 3_000,
            CefrLevel::B2 => 6_000,
            CefrLevel::C1 => 10_000,
            CefrLevel::C2 => 15_000,
        }
    }

    pub fn next(self) -> Option<CefrLevel> {
        let idx = Self::ALL.iter().position(|&l| l == self)?;
        Self::ALL.get(idx + 1).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            CefrLevel::A1 => "Beginner",
            CefrLevel::A2 => "Elementary",
            CefrLevel::B1 => "Intermediate",
            CefrLevel::B2 => "Upper Intermediate",
            CefrLevel::C1 => "Advanced",
            CefrLevel::C2 => "Proficient",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "A1" => Some(CefrLevel::A1),
            "A2" => Some(CefrLevel::A2),
            "B1" => Some(CefrLevel::B1),
            "B2" => Some(CefrLevel::B2),
            "C1" => Some(CefrLevel::C1),
            "C2" => Some(CefrLevel::C2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpTransactionKind {
    Lesson,
    Quiz,
    Review,
    Challenge,
    Achievement,
    Bonus,
    Penalty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpTransaction {
    pub id: Uuid,
    /// Negative for penalties
    pub amount: i64,
    pub kind: XpTransactionKind,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl XpTransaction {
    pub fn new(
        amount: i64,
        kind: XpTransactionKind,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            kind,
            description: description.into(),
            created_at,
        }
    }
}

/// Gamification state of one learner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProgress {
    pub xp_points: i64,
    pub coins: i64,
    pub streak_days: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
    pub current_level: CefrLevel,
}

impl Default for LearnerProgress {
    fn default() -> Self {
        Self {
            xp_points: 0,
            coins: STARTING_COINS,
            streak_days: 0,
            longest_streak: 0,
            last_activity_date: None,
            current_level: CefrLevel::A1,
        }
    }
}

impl LearnerProgress {
    /// Count one day of activity toward the daily streak.
    pub fn update_streak(&mut self, activity_date: NaiveDate) {
        self.streak_days = match self.last_activity_date {
            Some(last) => match (activity_date - last).num_days() {
                0 => self.streak_days.max(1),
                1 => self.streak_days + 1,
                // activity recorded out of order does not rewind the streak
                d if d < 0 => return,
                _ => 1,
            },
            None => 1,
        };
        self.longest_streak = self.longest_streak.max(self.streak_days);
        self.last_activity_date = Some(activity_date);
    }

    /// Add (or with a negative amount, remove) XP and apply level-ups.
    /// Returns the levels gained, lowest first.
    pub fn add_xp(&mut self, points: i64) -> Vec<CefrLevel> {
        self.xp_points = self.xp_points.saturating_add(points).max(0);

        let mut gained = Vec::new();
        while let Some(next) = self.current_level.next() {
            if self.xp_points < next.xp_threshold() {
                break;
            }
            self.current_level = next;
            gained.push(next);
        }
        gained
    }

    pub fn apply_transaction(
        &mut self,
        ledger: &mut Vec<XpTransaction>,
        tx: XpTransaction,
    ) -> Vec<CefrLevel> {
        let gained = self.add_xp(tx.amount);
        tracing::debug!(
            amount = tx.amount,
            kind = ?tx.kind,
            xp = self.xp_points,
            "xp transaction applied"
        );
        if let Some(level) = gained.last() {
            tracing::info!(level = ?level, xp = self.xp_points, "level up");
        }
        ledger.push(tx);
        gained
    }

    /// Progress toward the next level in percent; 100 at the top level.
    pub fn level_progress_percentage(&self) -> f64 {
        let Some(next) = self.current_level.next() else {
            return 100.0;
        };
        let current = self.current_level.xp_threshold();
        let span = (next.xp_threshold() - current) as f64;
        let progress = (self.xp_points - current) as f64 / span * 100.0;
        progress.clamp(0.0, 100.0)
    }
}

/// XP earned by a single vocabulary review.
pub fn xp_for_review(quality: Quality, newly_learned: bool, rewards: &RewardConfig) -> i64 {
    if !quality.is_passing() {
        return 0;
    }
    let bonus = if newly_learned {
        rewards.xp_word_learned_bonus
    } else {
        0
    };
    rewards.xp_per_review + bonus
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn test_defaults() {
        let p = LearnerProgress::default();
        assert_eq!(p.coins, 100);
        assert_eq!(p.current_level, CefrLevel::A1);
    }

    #[test]
    fn test_streak_consecutive_days() {
        let mut p = LearnerProgress::default();
        p.update_streak(day(1));
        p.update_streak(day(2));
        p.update_streak(day(2));
        p.update_streak(day(3));
        assert_eq!(p.streak_days, 3);
        assert_eq!(p.longest_streak, 3);
        assert_eq!(p.last_activity_date, Some(day(3)));
    }

    #[test]
    fn test_streak_gap_resets_but_keeps_longest() {
        let mut p = LearnerProgress::default();
        for d in 1..=4 {
            p.update_streak(day(d));
        }
        p.update_streak(day(10));
        assert_eq!(p.streak_days, 1);
        assert_eq!(p.longest_streak, 4);
    }

    #[test]
    fn test_streak_ignores_past_dates() {
        let mut p = LearnerProgress::default();
        p.update_streak(day(5));
        p.update_streak(day(6));
        p.update_streak(day(2));
        assert_eq!(p.streak_days, 2);
        assert_eq!(p.last_activity_date, Some(day(6)));
    }

    #[test]
    fn test_add_xp_levels_up_through_several_levels() {
        let mut p = LearnerProgress::default();
        let gained = p.add_xp(6_500);
        assert_eq!(gained, vec![CefrLevel::A2, CefrLevel::B1, CefrLevel::B2]);
        assert_eq!(p.current_level, CefrLevel::B2);
    }

    #[test]
    fn test_penalty_floors_at_zero_and_never_demotes() {
        let mut p = LearnerProgress::default();
        p.add_xp(1_200);
        assert_eq!(p.current_level, CefrLevel::A2);
        assert!(p.add_xp(-5_000).is_empty());
        assert_eq!(p.xp_points, 0);
        assert_eq!(p.current_level, CefrLevel::A2);
    }

    #[test]
    fn test_level_progress_percentage() {
        let mut p = LearnerProgress::default();
        p.add_xp(500);
        assert!((p.level_progress_percentage() - 50.0).abs() < 1e-9);
        p.add_xp(1_500);
        assert_eq!(p.current_level, CefrLevel::A2);
        assert!((p.level_progress_percentage() - 50.0).abs() < 1e-9);
        p.add_xp(20_000);
        assert_eq!(p.current_level, CefrLevel::C2);
        assert_eq!(p.level_progress_percentage(), 100.0);
    }

    #[test]
    fn test_apply_transaction_records_ledger() {
        let mut p = LearnerProgress::default();
        let mut ledger = Vec::new();
        let now = Utc::now();
        p.apply_transaction(
            &mut ledger,
            XpTransaction::new(1_000, XpTransactionKind::Lesson, "lesson 1", now),
        );
        p.apply_transaction(
            &mut ledger,
            XpTransaction::new(-50, XpTransactionKind::Penalty, "late", now),
        );
        assert_eq!(ledger.len(), 2);
        assert_eq!(p.xp_points, 950);
        assert_eq!(p.current_level, CefrLevel::A2);
    }

    #[test]
    fn test_xp_for_review() {
        let rewards = RewardConfig::default();
        let pass = Quality::new(4).unwrap();
        let fail = Quality::new(2).unwrap();
        assert_eq!(xp_for_review(pass, false, &rewards), 2);
        assert_eq!(xp_for_review(pass, true, &rewards), 7);
        assert_eq!(xp_for_review(fail, false, &rewards), 0);
    }

    #[test]
    fn test_cefr_parse_and_next() {
        assert_eq!(CefrLevel::parse("b2"), Some(CefrLevel::B2));
        assert_eq!(CefrLevel::C1.next(), Some(CefrLevel::C2));
        assert_eq!(CefrLevel::C2.next(), None);
        assert_eq!(CefrLevel::B1.label(), "Intermediate");
    }
}
