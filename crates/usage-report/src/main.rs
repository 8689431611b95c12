//! Usage report - Entry point.

use token_tracker::global_tracker;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use usage_report::{config::Config, run};

fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging (stderr only, stdout carries the usage lines)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting usage report");

    let tracker = global_tracker();
    let mut tracker = tracker.lock();

    match run(&config, &mut tracker) {
        Ok(stats) => info!(
            "Report complete: {} calls, {} tokens",
            stats.recorded,
            tracker.total_tokens()
        ),
        Err(e) => {
            error!("Report failed: {}", e);
            std::process::exit(1);
        }
    }
}
