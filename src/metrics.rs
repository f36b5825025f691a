use std::net::SocketAddr;

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

pub const ENV_METRICS_ADDR: &str = "METRICS_ADDR";

/// Serve Prometheus text format on `addr` (any path) for the lifetime of the
/// process. Must be called from inside the tokio runtime.
pub fn install_exporter(addr: SocketAddr) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("prometheus: install exporter")?;
    describe_pass_metrics();
    tracing::info!(%addr, "metrics exporter listening");
    Ok(())
}

/// `METRICS_ADDR` parsed, if set. A malformed value is an error, not a silent skip.
pub fn exporter_addr_from_env() -> Result<Option<SocketAddr>> {
    match std::env::var(ENV_METRICS_ADDR) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid {ENV_METRICS_ADDR} {v:?}")),
        _ => Ok(None),
    }
}

fn describe_pass_metrics() {
    describe_gauge!(
        "screener_last_pass_ts",
        "Unix timestamp (seconds) of the last finished pass."
    );
    describe_counter!(
        "screener_listings_skipped_seen_total",
        "Listings skipped because their url was already seen."
    );
    describe_counter!(
        "screener_listings_scored_total",
        "Scoring calls made."
    );
    describe_counter!(
        "screener_scoring_errors_total",
        "Scoring calls that failed and fell back to score 0."
    );
    describe_counter!(
        "screener_notifications_total",
        "Webhook notifications delivered."
    );
    describe_counter!(
        "screener_notify_errors_total",
        "Webhook notifications that failed."
    );
}
