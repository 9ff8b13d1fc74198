pub mod batch;
pub mod config;
pub mod logging;
pub mod services;
pub mod store;

use std::sync::Arc;

use crate::config::Config;
use crate::services::review::ReviewService;
use crate::store::InMemoryWordStateStore;

pub fn create_review_service(config: &Config) -> ReviewService<InMemoryWordStateStore> {
    ReviewService::new(Arc::new(InMemoryWordStateStore::new()), config.max_cas_retries)
}
