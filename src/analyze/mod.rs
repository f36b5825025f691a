// src/analyze/mod.rs
//! Listing scoring: the `Scorer` seam, the transient `Assessment`, and the
//! fallback applied when scoring fails.

pub mod ai_adapter;
pub mod scoring;

use anyhow::Result;
use metrics::counter;
use serde::Serialize;

use crate::ingest::types::Listing;

pub use crate::analyze::ai_adapter::OpenAiScorer;
pub use crate::analyze::scoring::{build_prompt, extract_reason, extract_score};

/// Score in [0, 10] plus the model's rationale. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub score: u8,
    pub rationale: String,
}

impl Assessment {
    /// What a failed scoring call counts as: a rejection.
    pub fn fallback() -> Self {
        Self {
            score: 0,
            rationale: "Score: 0/10\nReason: Error in scoring.".to_string(),
        }
    }

    /// Parse a free-text model response.
    pub fn from_response(text: &str) -> Self {
        Self {
            score: extract_score(text),
            rationale: extract_reason(text),
        }
    }

    pub fn passes(&self, threshold: u8) -> bool {
        self.score >= threshold
    }
}

#[async_trait::async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, listing: &Listing) -> Result<Assessment>;
    fn name(&self) -> &'static str;
}

/// Score a listing, folding any failure into `Assessment::fallback()`.
pub async fn assess(scorer: &dyn Scorer, listing: &Listing) -> Assessment {
    match scorer.score(listing).await {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(error = ?e, scorer = scorer.name(), title = %listing.title, "scoring failed");
            counter!("screener_scoring_errors_total").increment(1);
            Assessment::fallback()
        }
    }
}
