// src/ingest/providers/board_page.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::histogram;
use scraper::{ElementRef, Html, Selector};

use crate::config::BoardConfig;
use crate::ingest::types::{JobSource, Listing};
use crate::ingest::{collapse_whitespace, title_matches};

/// Compiled CSS selectors for one listings page layout.
struct Selectors {
    entry: Selector,
    title: Selector,
    company: Option<Selector>,
    description: Selector,
    link: Selector,
}

fn compile(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| anyhow!("invalid CSS selector {s:?}: {e}"))
}

impl Selectors {
    fn from_cfg(cfg: &BoardConfig) -> Result<Self> {
        Ok(Self {
            entry: compile(&cfg.entry_selector)?,
            title: compile(&cfg.title_selector)?,
            company: cfg.company_selector.as_deref().map(compile).transpose()?,
            description: compile(&cfg.description_selector)?,
            link: compile(&cfg.link_selector)?,
        })
    }
}

/// HTML listings page scraped with CSS selectors.
pub struct BoardPageProvider {
    cfg: BoardConfig,
    selectors: Selectors,
    client: reqwest::Client,
}

impl BoardPageProvider {
    /// Fails on selectors that do not compile, so a bad config surfaces at startup.
    pub fn new(cfg: BoardConfig, client: reqwest::Client) -> Result<Self> {
        let selectors = Selectors::from_cfg(&cfg)?;
        Ok(Self {
            cfg,
            selectors,
            client,
        })
    }

    /// Parse a listings page into listings. Pure; used directly by tests.
    pub fn parse_listings(&self, html: &str) -> Result<Vec<Listing>> {
        let t0 = std::time::Instant::now();
        let base = reqwest::Url::parse(&self.cfg.url).context("board url")?;
        let document = Html::parse_document(html);

        let mut out = Vec::new();
        for entry in document.select(&self.selectors.entry) {
            let title = first_text(entry, &self.selectors.title);
            if title.is_empty()
                || !title_matches(
                    &title,
                    &self.cfg.keyword,
                    self.cfg.exclude_keyword.as_deref(),
                )
            {
                continue;
            }

            let href = entry
                .select(&self.selectors.link)
                .find_map(|a| a.value().attr("href"))
                .or_else(|| entry.value().attr("href"));
            let Some(url) = href.and_then(|h| base.join(h.trim()).ok()) else {
                tracing::debug!(title = %title, "board: entry without link");
                continue;
            };

            let company = self
                .selectors
                .company
                .as_ref()
                .map(|sel| first_text(entry, sel))
                .filter(|c| !c.is_empty());

            out.push(Listing {
                source: self.name().to_string(),
                title,
                company,
                description: first_text(entry, &self.selectors.description),
                url: url.to_string(),
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("screener_source_parse_ms", "source" => self.name()).record(ms);
        Ok(out)
    }
}

fn first_text(scope: ElementRef<'_>, sel: &Selector) -> String {
    scope
        .select(sel)
        .next()
        // text nodes are already entity-decoded by the parser
        .map(|el| collapse_whitespace(&el.text().collect::<Vec<_>>().join(" ")))
        .unwrap_or_default()
}

#[async_trait]
impl JobSource for BoardPageProvider {
    async fn fetch_listings(&self) -> Result<Vec<Listing>> {
        let body = self
            .client
            .get(&self.cfg.url)
            .send()
            .await
            .context("board http get()")?
            .error_for_status()
            .context("board non-2xx")?
            .text()
            .await
            .context("board http .text()")?;
        self.parse_listings(&body)
    }

    fn name(&self) -> &'static str {
        "Board"
    }
}
