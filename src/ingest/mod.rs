// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::{JobSource, Listing};
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "screener_listings_fetched_total",
            "Listings returned by source adapters."
        );
        describe_counter!(
            "screener_source_errors_total",
            "Source adapter fetch/parse errors."
        );
        describe_histogram!(
            "screener_source_parse_ms",
            "Adapter parse time in milliseconds."
        );
    });
}

/// Strip markup from a fragment: decode entities, drop tags, collapse whitespace.
pub fn strip_markup(s: &str) -> String {
    // 1) HTML entity decode (may surface escaped tags, removed next)
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags; a space keeps block siblings from gluing together
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[a-z!][^>]*>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    collapse_whitespace(&out)
}

/// Collapse runs of whitespace to one space and trim. For text that is
/// already decoded (DOM text nodes), this is the only cleanup applied.
pub fn collapse_whitespace(s: &str) -> String {
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(s, " ").trim().to_string()
}

/// Cap `s` at `max` characters (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    s.chars().take(max).collect()
}

/// Keyword filter on a listing title. Both checks are case-insensitive;
/// an empty keyword accepts every title.
pub fn title_matches(title: &str, keyword: &str, exclude: Option<&str>) -> bool {
    let t = title.to_lowercase();
    let wanted = keyword.trim().is_empty() || t.contains(&keyword.trim().to_lowercase());
    let excluded = exclude
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .is_some_and(|x| t.contains(&x.to_lowercase()));
    wanted && !excluded
}

/// Fetch from every source in order and concatenate the results.
/// A failing source is logged and contributes nothing.
pub async fn gather_listings(sources: &[Box<dyn JobSource>]) -> Vec<Listing> {
    ensure_metrics_described();

    let mut all = Vec::new();
    for s in sources {
        match s.fetch_listings().await {
            Ok(mut v) => {
                tracing::info!(source = s.name(), count = v.len(), "source returned listings");
                counter!("screener_listings_fetched_total", "source" => s.name()).increment(v.len() as u64);
                all.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(error = ?e, source = s.name(), "source error");
                counter!("screener_source_errors_total", "source" => s.name()).increment(1);
            }
        }
    }
    all
}
