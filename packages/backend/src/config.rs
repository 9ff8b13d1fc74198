use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: PathBuf,
    pub daily_review_limit: usize,
    pub max_cas_retries: u32,
    pub rewards: RewardConfig,
    pub assessment_passing_score: u32,
}

/// XP granted for learning activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardConfig {
    pub xp_per_lesson: i64,
    pub xp_per_review: i64,
    pub xp_word_learned_bonus: i64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            xp_per_lesson: 10,
            xp_per_review: 2,
            xp_word_learned_bonus: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            enable_file_logs: false,
            log_dir: PathBuf::from("./logs"),
            daily_review_limit: 100,
            max_cas_retries: 3,
            rewards: RewardConfig::default(),
            assessment_passing_score: 70,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let rewards = RewardConfig {
            xp_per_lesson: parse_or(&lookup, "XP_PER_LESSON", defaults.rewards.xp_per_lesson),
            xp_per_review: parse_or(&lookup, "XP_PER_REVIEW", defaults.rewards.xp_per_review),
            xp_word_learned_bonus: parse_or(
                &lookup,
                "XP_WORD_LEARNED_BONUS",
                defaults.rewards.xp_word_learned_bonus,
            ),
        };

        Self {
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            enable_file_logs: lookup("ENABLE_FILE_LOGS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.enable_file_logs),
            log_dir: lookup("LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir),
            daily_review_limit: parse_or(&lookup, "DAILY_REVIEW_LIMIT", defaults.daily_review_limit),
            max_cas_retries: parse_or(&lookup, "MAX_CAS_RETRIES", defaults.max_cas_retries),
            rewards,
            assessment_passing_score: parse_or(
                &lookup,
                "ASSESSMENT_PASSING_SCORE",
                defaults.assessment_passing_score,
            ),
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(default)
}
