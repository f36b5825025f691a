//! Prompt construction and response parsing for listing scores.
//!
//! The model is asked to answer in a fixed two-line shape:
//! ```text
//! Score: X/10
//! Reason: [short reason]
//! ```
//! Anything else parses as score 0.

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::config::ScorerConfig;
use crate::ingest::types::Listing;

/// Highest score a listing can receive.
pub const MAX_SCORE: u8 = 10;

/// Render the screening prompt for one listing.
pub fn build_prompt(listing: &Listing, cfg: &ScorerConfig) -> String {
    format!(
        "You are an AI job screener. Rate this job on a scale from 1 to 10 based on:\n\
         - Role relevance to '{role}'\n\
         - Seniority (prefer senior roles)\n\
         - Remote work option\n\
         - Salary (prefer {salary})\n\
         Here's the job:\n\
         \n\
         Title: {title}\n\
         Company: {company}\n\
         Description: {description}\n\
         \n\
         Respond in this format:\n\
         Score: X/10\n\
         Reason: [short reason]\n",
        role = cfg.role,
        salary = cfg.salary_floor,
        title = listing.title,
        company = listing.company_or_unknown(),
        description = listing.description,
    )
}

/// First `Score: X/10` in the text, clamped to [0, 10]; 0 when absent.
pub fn extract_score(text: &str) -> u8 {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"Score:\s*(\d+)/10").unwrap());
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| {
            // digits only, so overflow is the sole parse failure
            m.as_str()
                .parse::<u32>()
                .map(|v| v.min(MAX_SCORE as u32) as u8)
                .unwrap_or(MAX_SCORE)
        })
        .unwrap_or(0)
}

/// Text after `Reason:`, or the whole trimmed response when the label is missing.
pub fn extract_reason(text: &str) -> String {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"(?is)Reason:\s*(.+)").unwrap());
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| text.trim().to_string())
}
