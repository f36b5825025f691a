//! Job Screener: binary entrypoint
//! Loads configuration, runs one pass at startup (unless disabled), then
//! runs a pass every day at the configured local time.

use job_screener::scheduler::{local_now, run_daily_after_startup};
use job_screener::{build_screener, metrics, ScreenerConfig};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("job_screener=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = ScreenerConfig::load()?;
    tracing::info!(secrets = ?cfg.secrets, "configuration loaded");

    if let Some(addr) = metrics::exporter_addr_from_env()? {
        metrics::install_exporter(addr)?;
    }

    let screener = build_screener(&cfg)?;
    let run_at = cfg.schedule.run_at_time()?;

    let screener = &screener;
    run_daily_after_startup(
        run_at,
        cfg.schedule.run_on_start,
        Duration::from_secs(cfg.schedule.poll_interval_secs),
        local_now,
        move || async move {
            screener.run_once().await;
        },
    )
    .await;

    Ok(())
}
