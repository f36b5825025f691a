// src/config/mod.rs
//! Startup configuration.
//!
//! Built once in `main` and handed to each component by value or reference.
//! Layering: built-in defaults, then an optional TOML file, then secrets from
//! the environment.
//!   1) $SCREENER_CONFIG_PATH (must exist when set)
//!   2) config/screener.toml (if present)

pub mod ai;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveTime;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub use ai::ScorerConfig;

pub const ENV_CONFIG_PATH: &str = "SCREENER_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/screener.toml";

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_WEBHOOK_URL: &str = "WEBHOOK_URL";
pub const ENV_SERPAPI_KEY: &str = "SERPAPI_KEY";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    pub schedule: ScheduleConfig,
    pub pass: PassConfig,
    pub scorer: ScorerConfig,
    pub sources: SourcesConfig,
    #[serde(skip)]
    pub secrets: Secrets,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Local wall-clock time, "HH:MM" or "HH:MM:SS".
    pub run_at: String,
    pub poll_interval_secs: u64,
    pub run_on_start: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            run_at: "09:00".to_string(),
            poll_interval_secs: 30,
            run_on_start: true,
        }
    }
}

impl ScheduleConfig {
    pub fn run_at_time(&self) -> Result<NaiveTime> {
        let s = self.run_at.trim();
        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .with_context(|| format!("invalid schedule.run_at {s:?} (expected HH:MM)"))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PassConfig {
    pub threshold: u8,
    pub listing_delay_secs: u64,
    /// 0 disables the cap.
    pub max_scores_per_pass: usize,
    pub seen_path: PathBuf,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            threshold: 7,
            listing_delay_secs: 20,
            max_scores_per_pass: 20,
            seen_path: PathBuf::from("seen_jobs.json"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourcesConfig {
    pub remoteok: RemoteOkConfig,
    pub board: BoardConfig,
    pub serpapi: SerpApiConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteOkConfig {
    pub enabled: bool,
    pub url: String,
    pub keyword: String,
    pub max_description_chars: usize,
}

impl Default for RemoteOkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://remoteok.com/api".to_string(),
            keyword: "data".to_string(),
            max_description_chars: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoardConfig {
    pub enabled: bool,
    pub url: String,
    pub keyword: String,
    pub exclude_keyword: Option<String>,
    pub entry_selector: String,
    pub title_selector: String,
    pub company_selector: Option<String>,
    pub description_selector: String,
    pub link_selector: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://weworkremotely.com/categories/remote-programming-jobs".to_string(),
            keyword: "data".to_string(),
            exclude_keyword: Some("intern".to_string()),
            entry_selector: "section.jobs li".to_string(),
            title_selector: "span.title".to_string(),
            company_selector: Some("span.company".to_string()),
            description_selector: "span.region".to_string(),
            link_selector: "a[href]".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SerpApiConfig {
    pub enabled: bool,
    pub url: String,
    pub engine: String,
    pub query: String,
    pub location: String,
    pub hl: String,
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://serpapi.com/search.json".to_string(),
            engine: "google_jobs".to_string(),
            query: "senior data scientist remote".to_string(),
            location: "United States".to_string(),
            hl: "en".to_string(),
        }
    }
}

/// API keys and endpoints that only ever come from the environment.
#[derive(Clone, Default)]
pub struct Secrets {
    pub openai_api_key: String,
    pub webhook_url: String,
    pub serpapi_key: Option<String>,
}

impl fmt::Debug for Secrets {
    // Key lengths only; never print the values.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("openai_key_len", &self.openai_api_key.len())
            .field("webhook_set", &!self.webhook_url.is_empty())
            .field("serpapi_key_len", &self.serpapi_key.as_ref().map(String::len))
            .finish()
    }
}

impl Secrets {
    pub fn from_env() -> Result<Self> {
        let openai_api_key = non_empty_env(ENV_OPENAI_API_KEY)
            .ok_or_else(|| anyhow!("Missing {ENV_OPENAI_API_KEY} env var"))?;
        let webhook_url = non_empty_env(ENV_WEBHOOK_URL)
            .ok_or_else(|| anyhow!("Missing {ENV_WEBHOOK_URL} env var"))?;
        Ok(Self {
            openai_api_key,
            webhook_url,
            serpapi_key: non_empty_env(ENV_SERPAPI_KEY),
        })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ScreenerConfig {
    /// Full startup load: file layer (if any) plus environment secrets.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file_default()?;
        cfg.secrets = Secrets::from_env()?;
        Ok(cfg)
    }

    /// Load the file layer from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: ScreenerConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// File layer using env var + fallback; built-in defaults when neither exists.
    pub fn load_file_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                bail!("{ENV_CONFIG_PATH} points to non-existent path");
            }
            return Self::load_from(&pb);
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        Ok(Self::default())
    }

    fn validate(&mut self) -> Result<()> {
        self.schedule.run_at_time()?;
        if self.schedule.poll_interval_secs == 0 {
            self.schedule.poll_interval_secs = ScheduleConfig::default().poll_interval_secs;
        }
        if self.pass.threshold > 10 {
            bail!("pass.threshold must be within 0..=10, got {}", self.pass.threshold);
        }
        self.scorer.sanitize();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = ScreenerConfig::default();
        assert_eq!(cfg.pass.threshold, 7);
        assert_eq!(cfg.pass.listing_delay_secs, 20);
        assert_eq!(cfg.pass.max_scores_per_pass, 20);
        assert_eq!(cfg.pass.seen_path, PathBuf::from("seen_jobs.json"));
        assert_eq!(cfg.schedule.poll_interval_secs, 30);
        assert_eq!(
            cfg.schedule.run_at_time().unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = ScreenerConfig::from_toml_str(
            r#"
[schedule]
run_at = "07:30"

[sources.board]
enabled = false

[sources.remoteok]
keyword = "analyst"
"#,
        )
        .unwrap();
        assert_eq!(
            cfg.schedule.run_at_time().unwrap(),
            NaiveTime::from_hms_opt(7, 30, 0).unwrap()
        );
        assert!(!cfg.sources.board.enabled);
        assert_eq!(cfg.sources.remoteok.keyword, "analyst");
        assert_eq!(cfg.sources.remoteok.max_description_chars, 1000);
        assert_eq!(cfg.pass, PassConfig::default());
    }

    #[test]
    fn invalid_time_and_threshold_are_rejected() {
        assert!(ScreenerConfig::from_toml_str("[schedule]\nrun_at = \"25:99\"").is_err());
        assert!(ScreenerConfig::from_toml_str("[pass]\nthreshold = 11").is_err());
    }

    #[test]
    fn secrets_debug_hides_values() {
        let s = Secrets {
            openai_api_key: "sk-secret".into(),
            webhook_url: "https://hooks.example/abc".into(),
            serpapi_key: None,
        };
        let dbg = format!("{s:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(!dbg.contains("hooks.example"));
    }
}
