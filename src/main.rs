//! This file defines the hydroscope binary entry point.

use hydroscope::app::{self, AppState};
use hydroscope::cli;
use hydroscope::dataset::Dataset;
use hydroscope::metrics;
use hydroscope::narrative::GeminiClient;
use hydroscope::server;
use hydroscope::tracing;

use std::sync::Arc;

/// Application entry point
#[tokio::main]
async fn main() {
    let args = cli::parse();
    tracing::init_tracing();
    metrics::register_metrics();
    let dataset = Dataset::from_path(&args.dataset_path).unwrap_or_else(|err| {
        eprintln!("failed to load dataset from {}: {}", args.dataset_path, err);
        std::process::exit(1);
    });
    let narrative = GeminiClient::new(&args).expect("failed to construct narrative client");
    let state = Arc::new(AppState {
        dataset,
        narrative: Arc::new(narrative),
    });
    let router = app::router(state);
    server::serve(&args, router).await;
}
