pub mod certificate;
pub mod progress;
pub mod review;
pub mod scoring;
pub mod vocabulary_stats;
