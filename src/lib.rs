// src/lib.rs
// Public library surface for the daemon, the probe binary, and integration tests.

pub mod analyze;
pub mod config;
pub mod ingest;
pub mod metrics;
pub mod notify;
pub mod runner;
pub mod scheduler;
pub mod seen;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{Assessment, Scorer};
pub use crate::config::ScreenerConfig;
pub use crate::ingest::types::{JobSource, Listing};
pub use crate::notify::Notifier;
pub use crate::runner::{PassOptions, PassReport, Screener};
pub use crate::seen::{SeenSet, SeenStore};

use std::time::Duration;

use anyhow::{Context, Result};

/// Shared client for the source adapters and the webhook.
pub fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("job-screener/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .build()
        .context("building http client")
}

/// Wire the production screener from configuration.
pub fn build_screener(cfg: &ScreenerConfig) -> Result<Screener> {
    let client = build_http_client()?;
    let sources = ingest::providers::build_sources(cfg, &client)?;
    let scorer = analyze::OpenAiScorer::new(cfg.scorer.clone(), cfg.secrets.openai_api_key.clone())?;
    let notifier = notify::WebhookNotifier::new(cfg.secrets.webhook_url.clone(), client);
    tracing::info!(
        sources = ?sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
        model = %cfg.scorer.model,
        seen_path = %cfg.pass.seen_path.display(),
        "screener configured"
    );
    Ok(Screener::new(
        sources,
        Box::new(scorer),
        Box::new(notifier),
        SeenStore::new(cfg.pass.seen_path.clone()),
        PassOptions::from_config(&cfg.pass),
    ))
}
