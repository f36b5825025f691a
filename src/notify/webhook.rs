use anyhow::{Context, Result};
use reqwest::Client;

use super::{format_message, Notifier};
use crate::analyze::Assessment;
use crate::ingest::types::Listing;

/// Posts `{"text": ...}` to an incoming-webhook URL (Slack and compatibles).
pub struct WebhookNotifier {
    webhook_url: String,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(webhook_url: String, client: Client) -> Self {
        Self {
            webhook_url,
            client,
        }
    }

    pub async fn send_text(&self, text: &str) -> Result<()> {
        let body = serde_json::json!({ "text": text });
        self.client
            .post(&self.webhook_url)
            .json(&body)
            .send()
            .await
            .context("webhook post")?
            .error_for_status()
            .context("webhook non-2xx")?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, listing: &Listing, assessment: &Assessment) -> Result<()> {
        self.send_text(&format_message(listing, assessment)).await
    }
}
