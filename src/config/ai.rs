// src/config/ai.rs
use serde::{Deserialize, Serialize};

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}
fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}
fn default_role() -> String {
    "Data Science".to_string()
}
fn default_salary_floor() -> String {
    "$140k+".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[scorer]` section: which model to ask and what the screening criteria are.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScorerConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Full chat-completions URL; point at any OpenAI-compatible server.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Target role the listing is judged against.
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "default_salary_floor")]
    pub salary_floor: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            role: default_role(),
            salary_floor: default_salary_floor(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ScorerConfig {
    pub(crate) fn sanitize(&mut self) {
        if self.model.trim().is_empty() {
            self.model = default_model();
        }
        if self.role.trim().is_empty() {
            self.role = default_role();
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = default_timeout_secs();
        }
    }
}
