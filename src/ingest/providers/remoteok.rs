// src/ingest/providers/remoteok.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::histogram;
use serde::Deserialize;

use crate::config::RemoteOkConfig;
use crate::ingest::types::{JobSource, Listing};
use crate::ingest::{strip_markup, title_matches, truncate_chars};

/// One record of the board API. The first element of the array is a legal
/// notice with none of these fields, so everything is optional.
#[derive(Debug, Deserialize)]
struct Record {
    position: Option<String>,
    company: Option<String>,
    description: Option<String>,
    url: Option<String>,
}

/// Job-board JSON API in the RemoteOK shape.
pub struct RemoteOkProvider {
    cfg: RemoteOkConfig,
    client: reqwest::Client,
}

impl RemoteOkProvider {
    pub fn new(cfg: RemoteOkConfig, client: reqwest::Client) -> Self {
        Self { cfg, client }
    }

    /// Parse an API response body into listings. Pure; used directly by tests.
    pub fn parse_listings(&self, body: &str) -> Result<Vec<Listing>> {
        let t0 = std::time::Instant::now();
        let records: Vec<serde_json::Value> =
            serde_json::from_str(body).context("parsing remoteok json")?;

        let mut out = Vec::new();
        // First item is metadata
        for raw in records.into_iter().skip(1) {
            let rec: Record = match serde_json::from_value(raw) {
                Ok(r) => r,
                Err(e) => {
                    tracing::debug!(error = %e, "remoteok: skipping malformed record");
                    continue;
                }
            };
            let title = strip_markup(rec.position.as_deref().unwrap_or_default());
            if title.is_empty() || !title_matches(&title, &self.cfg.keyword, None) {
                continue;
            }
            let Some(url) = rec.url.as_deref().and_then(|u| self.absolute_url(u)) else {
                continue;
            };
            let description = truncate_chars(
                &strip_markup(rec.description.as_deref().unwrap_or_default()),
                self.cfg.max_description_chars,
            );
            out.push(Listing {
                source: self.name().to_string(),
                title,
                company: rec.company.filter(|c| !c.trim().is_empty()),
                description,
                url,
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("screener_source_parse_ms", "source" => self.name()).record(ms);
        Ok(out)
    }

    /// Record urls are usually site-relative ("/remote-jobs/123").
    fn absolute_url(&self, u: &str) -> Option<String> {
        let u = u.trim();
        if u.is_empty() {
            return None;
        }
        if u.starts_with("http://") || u.starts_with("https://") {
            return Some(u.to_string());
        }
        let base = reqwest::Url::parse(&self.cfg.url).ok()?;
        base.join(u).ok().map(|j| j.to_string())
    }
}

#[async_trait]
impl JobSource for RemoteOkProvider {
    async fn fetch_listings(&self) -> Result<Vec<Listing>> {
        let body = self
            .client
            .get(&self.cfg.url)
            .send()
            .await
            .context("remoteok http get()")?
            .error_for_status()
            .context("remoteok non-2xx")?
            .text()
            .await
            .context("remoteok http .text()")?;
        self.parse_listings(&body)
    }

    fn name(&self) -> &'static str {
        "RemoteOK"
    }
}
