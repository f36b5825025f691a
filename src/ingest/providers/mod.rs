// src/ingest/providers/mod.rs
pub mod board_page;
pub mod remoteok;
pub mod serpapi;

use anyhow::Result;

use crate::config::ScreenerConfig;
use crate::ingest::types::JobSource;

/// Build the enabled sources in fixed order: RemoteOK, board page, SerpAPI.
/// SerpAPI is left out when no API key is configured.
pub fn build_sources(
    cfg: &ScreenerConfig,
    client: &reqwest::Client,
) -> Result<Vec<Box<dyn JobSource>>> {
    let mut sources: Vec<Box<dyn JobSource>> = Vec::new();

    if cfg.sources.remoteok.enabled {
        sources.push(Box::new(remoteok::RemoteOkProvider::new(
            cfg.sources.remoteok.clone(),
            client.clone(),
        )));
    }
    if cfg.sources.board.enabled {
        sources.push(Box::new(board_page::BoardPageProvider::new(
            cfg.sources.board.clone(),
            client.clone(),
        )?));
    }
    if cfg.sources.serpapi.enabled {
        match &cfg.secrets.serpapi_key {
            Some(key) => sources.push(Box::new(serpapi::SerpApiProvider::new(
                cfg.sources.serpapi.clone(),
                key.clone(),
                client.clone(),
            ))),
            None => tracing::warn!("SerpAPI source disabled: SERPAPI_KEY not set"),
        }
    }

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serpapi_needs_a_key() {
        let client = reqwest::Client::new();
        let mut cfg = ScreenerConfig::default();
        let names: Vec<_> = build_sources(&cfg, &client)
            .unwrap()
            .iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(names, ["RemoteOK", "Board"]);

        cfg.secrets.serpapi_key = Some("k".into());
        cfg.sources.remoteok.enabled = false;
        let names: Vec<_> = build_sources(&cfg, &client)
            .unwrap()
            .iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(names, ["Board", "SerpAPI"]);
    }
}
