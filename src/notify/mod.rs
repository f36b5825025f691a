pub mod webhook;

use anyhow::Result;

use crate::analyze::Assessment;
use crate::ingest::types::Listing;

pub use webhook::WebhookNotifier;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, listing: &Listing, assessment: &Assessment) -> Result<()>;
}

/// Fixed chat message for a listing that passed the threshold.
pub fn format_message(listing: &Listing, assessment: &Assessment) -> String {
    let heading = match &listing.company {
        Some(c) => format!("*{}* at {}", listing.title, c),
        None => format!("*{}*", listing.title),
    };
    format!(
        "{heading}\n{url}\nScore: {score}/10\n{reason}",
        url = listing.url,
        score = assessment.score,
        reason = assessment.rationale,
    )
}
