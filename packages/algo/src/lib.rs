//! # eit-algo - vocabulary scheduling algorithms
//!
//! Pure Rust algorithms for IT-English vocabulary practice:
//!
//! - **SM-2 Scheduler** - review intervals, easiness factor and learning
//!   status from 0-5 recall quality ratings
//!
//! Nothing in this crate performs I/O or reads the clock; callers pass `now`
//! explicitly and persist the returned state themselves.
//!
//! ## Modules
//!
//! - [`sm2`] - the review update, status derivation, interval preview
//! - [`quality`] - validated quality ratings and answer/button mapping
//! - [`batch`] - parallel batch review application and due forecasts
//! - [`sanitize`] - invariant checks and repair for stored states
//! - [`types`] - shared types and constants
//! - [`error`] - scheduler errors
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use eit_algo::{record_review, LearnerWordState, WordStatus};
//!
//! let now = Utc::now();
//! let state = LearnerWordState::new(now);
//! let state = record_review(&state, 5, now).unwrap();
//! assert_eq!(state.interval_days, 1);
//! assert_eq!(state.status, WordStatus::Review);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod batch;
pub mod error;
pub mod quality;
pub mod sanitize;
pub mod sm2;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use error::{SchedulerError, SchedulerResult};

pub use quality::Quality;

pub use sm2::{ignore, preview_intervals, record_quality, record_review};

pub use batch::{apply_reviews, forecast_due, BatchReviewItem};

pub use sanitize::{sanitize_state, validate_state};
