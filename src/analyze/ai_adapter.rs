//! OpenAI-compatible chat-completions scorer.
//! One request per listing; no retry, no caching.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use super::{scoring::build_prompt, Assessment, Scorer};
use crate::config::ScorerConfig;
use crate::ingest::types::Listing;

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

/// Scores listings via `POST {endpoint}` with bearer auth.
pub struct OpenAiScorer {
    http: reqwest::Client,
    api_key: String,
    cfg: ScorerConfig,
}

impl OpenAiScorer {
    pub fn new(cfg: ScorerConfig, api_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("job-screener/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building scorer http client")?;
        Ok(Self { http, api_key, cfg })
    }

    /// Raw completion text for a prompt.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let req = Req {
            model: &self.cfg.model,
            messages: vec![Msg {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .http
            .post(&self.cfg.endpoint)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("chat completion request")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "chat completion HTTP {status}: {}",
                body.chars().take(200).collect::<String>()
            ));
        }

        let body: Resp = resp.json().await.context("chat completion body")?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| anyhow!("chat completion returned no content"))
    }
}

#[async_trait::async_trait]
impl Scorer for OpenAiScorer {
    async fn score(&self, listing: &Listing) -> Result<Assessment> {
        let prompt = build_prompt(listing, &self.cfg);
        let content = self.complete(&prompt).await?;
        Ok(Assessment::from_response(&content))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
