// src/ingest/types.rs
use anyhow::Result;

/// A normalized job posting produced by a source adapter.
///
/// Only `url` outlives a pass: it is the identifier stored in the seen set.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Listing {
    pub source: String, // e.g., "RemoteOK", "Board", "SerpAPI"
    pub title: String,
    pub company: Option<String>,
    pub description: String, // markup stripped
    pub url: String,
}

impl Listing {
    pub fn company_or_unknown(&self) -> &str {
        self.company.as_deref().unwrap_or("Unknown")
    }
}

#[async_trait::async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch_listings(&self) -> Result<Vec<Listing>>;
    fn name(&self) -> &'static str;
}
