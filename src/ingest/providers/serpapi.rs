// src/ingest/providers/serpapi.rs
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use metrics::histogram;
use serde::Deserialize;

use crate::config::SerpApiConfig;
use crate::ingest::strip_markup;
use crate::ingest::types::{JobSource, Listing};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    jobs_results: Vec<JobResult>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobResult {
    title: Option<String>,
    company_name: Option<String>,
    description: Option<String>,
    share_link: Option<String>,
    #[serde(default)]
    apply_options: Vec<Link>,
    #[serde(default)]
    related_links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    link: Option<String>,
}

impl JobResult {
    fn best_url(&self) -> Option<String> {
        self.share_link
            .iter()
            .chain(self.apply_options.iter().filter_map(|l| l.link.as_ref()))
            .chain(self.related_links.iter().filter_map(|l| l.link.as_ref()))
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Search-aggregator API (SerpAPI Google Jobs engine).
pub struct SerpApiProvider {
    cfg: SerpApiConfig,
    api_key: String,
    client: reqwest::Client,
}

impl SerpApiProvider {
    pub fn new(cfg: SerpApiConfig, api_key: String, client: reqwest::Client) -> Self {
        Self {
            cfg,
            api_key,
            client,
        }
    }

    /// Query parameters for the search request.
    pub fn query_params(&self) -> [(&'static str, &str); 5] {
        [
            ("engine", self.cfg.engine.as_str()),
            ("q", self.cfg.query.as_str()),
            ("hl", self.cfg.hl.as_str()),
            ("location", self.cfg.location.as_str()),
            ("api_key", self.api_key.as_str()),
        ]
    }

    /// Map a search response body to listings. Pure; used directly by tests.
    pub fn parse_listings(&self, body: &str) -> Result<Vec<Listing>> {
        let t0 = std::time::Instant::now();
        let resp: SearchResponse = serde_json::from_str(body).context("parsing serpapi json")?;
        if let Some(err) = resp.error {
            // "hasn't returned any results" is reported as an error by the API
            if resp.jobs_results.is_empty() && err.to_ascii_lowercase().contains("any results") {
                return Ok(Vec::new());
            }
            bail!("serpapi error: {err}");
        }

        let mut out = Vec::with_capacity(resp.jobs_results.len());
        for job in resp.jobs_results {
            let Some(url) = job.best_url() else {
                tracing::debug!(title = ?job.title, "serpapi: record without link");
                continue;
            };
            let title = strip_markup(job.title.as_deref().unwrap_or_default());
            if title.is_empty() {
                continue;
            }
            out.push(Listing {
                source: self.name().to_string(),
                title,
                company: job.company_name.filter(|c| !c.trim().is_empty()),
                description: strip_markup(job.description.as_deref().unwrap_or_default()),
                url,
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("screener_source_parse_ms", "source" => self.name()).record(ms);
        Ok(out)
    }
}

#[async_trait]
impl JobSource for SerpApiProvider {
    async fn fetch_listings(&self) -> Result<Vec<Listing>> {
        let body = self
            .client
            .get(&self.cfg.url)
            .query(&self.query_params())
            .send()
            .await
            .context("serpapi http get()")?
            .error_for_status()
            .context("serpapi non-2xx")?
            .text()
            .await
            .context("serpapi http .text()")?;
        self.parse_listings(&body)
    }

    fn name(&self) -> &'static str {
        "SerpAPI"
    }
}
