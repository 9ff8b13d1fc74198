use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;

use eit_backend::batch::{self, BatchError, ReplaySummary};
use eit_backend::config::Config;
use eit_backend::{create_review_service, logging};

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config);

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: eit-backend <review-batch.json>");
        return ExitCode::from(2);
    };

    match run(&config, path) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to encode summary");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "batch replay failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, path: PathBuf) -> Result<ReplaySummary, BatchError> {
    tracing::info!(path = %path.display(), "loading review batch");
    let reviews = batch::load_review_batch(&path)?;
    let service = create_review_service(config);
    batch::replay(&service, &reviews, config, Utc::now())
}
