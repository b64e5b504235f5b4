//! Price Poll — command-line entry point.
//!
//! Loads configuration, initialises structured logging, scores the
//! contest record, prints the results report, and optionally serves the
//! dashboard until Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use price_poll::config::AppConfig;
use price_poll::dashboard::{self, DashboardState};
use price_poll::report::{self, ReportOptions};
use price_poll::scoring;
use price_poll::storage;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path = AppConfig::path_from_env();
    let cfg = AppConfig::load(&config_path)?;

    init_logging();

    info!(
        contest = %cfg.contest.name,
        data_file = %cfg.contest.data_file,
        currency = %cfg.contest.currency,
        config = %config_path,
        "Price poll starting up"
    );

    // -- Score -----------------------------------------------------------

    let record = storage::load_record(&cfg.contest.data_file, cfg.contest.currency)?;
    let results = scoring::evaluate(&record);

    let options = ReportOptions {
        title: cfg.contest.name.clone(),
        currency: cfg.contest.currency,
        show_yearly: cfg.report.show_yearly,
    };
    print!("{}", report::render(&results, &options));

    if let Some(path) = &cfg.report.export_standings {
        storage::export_standings(&results.standings, path)?;
        info!(path = %path, participants = results.standings.len(), "Standings exported");
    }

    // -- Dashboard -------------------------------------------------------

    if !cfg.dashboard.enabled {
        return Ok(());
    }

    let state = Arc::new(DashboardState::new(
        cfg.contest.name.clone(),
        cfg.contest.data_file.clone(),
        cfg.contest.currency,
    ));

    info!(port = cfg.dashboard.port, "Serving dashboard. Press Ctrl+C to stop.");
    dashboard::serve(state, cfg.dashboard.port, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C, serving until killed");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received.");
    })
    .await?;

    info!("Price poll shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("price_poll=info"));

    let json_logging = std::env::var("PRICE_POLL_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
