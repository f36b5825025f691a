//! # Runner
//! One screening pass: gather listings, drop the ones already seen, score the
//! rest, notify the ones at or above threshold, and hand back the grown seen
//! set. Persistence lives in `run_once`; `run_pass` only touches the network
//! through the injected sources, scorer and notifier.

use std::collections::HashSet;
use std::time::Duration;

use metrics::{counter, gauge};
use serde::Serialize;

use crate::analyze::{assess, Assessment, Scorer};
use crate::config::PassConfig;
use crate::ingest::gather_listings;
use crate::ingest::types::{JobSource, Listing};
use crate::notify::Notifier;
use crate::seen::{SeenSet, SeenStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassOptions {
    /// Minimum score (inclusive) that triggers a notification.
    pub threshold: u8,
    /// Pause after each scored listing.
    pub listing_delay: Duration,
    /// Stop scoring after this many calls in one pass.
    pub max_scores: Option<usize>,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self::from_config(&PassConfig::default())
    }
}

impl PassOptions {
    pub fn from_config(cfg: &PassConfig) -> Self {
        Self {
            threshold: cfg.threshold,
            listing_delay: Duration::from_secs(cfg.listing_delay_secs),
            max_scores: (cfg.max_scores_per_pass > 0).then_some(cfg.max_scores_per_pass),
        }
    }
}

/// A listing that passed the threshold and was handed to the notifier.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub listing: Listing,
    pub assessment: Assessment,
    /// False when the webhook call failed; the url is marked seen either way.
    pub delivered: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PassReport {
    /// Input seen set plus the urls notified during this pass.
    pub seen: SeenSet,
    pub notifications: Vec<Notification>,
    pub fetched: usize,
    pub skipped_seen: usize,
    pub scored: usize,
    pub rejected: usize,
    pub cap_reached: bool,
}

pub struct Screener {
    sources: Vec<Box<dyn JobSource>>,
    scorer: Box<dyn Scorer>,
    notifier: Box<dyn Notifier>,
    store: SeenStore,
    options: PassOptions,
}

impl Screener {
    pub fn new(
        sources: Vec<Box<dyn JobSource>>,
        scorer: Box<dyn Scorer>,
        notifier: Box<dyn Notifier>,
        store: SeenStore,
        options: PassOptions,
    ) -> Self {
        Self {
            sources,
            scorer,
            notifier,
            store,
            options,
        }
    }

    /// Fetch from every source and screen the result against `seen`.
    pub async fn run_pass(&self, seen: &SeenSet) -> PassReport {
        let listings = gather_listings(&self.sources).await;
        tracing::info!(count = listings.len(), "fetched listings");
        screen_listings(
            listings,
            seen,
            self.scorer.as_ref(),
            self.notifier.as_ref(),
            &self.options,
        )
        .await
    }

    /// load → pass → save. Never fails; a save error is logged.
    pub async fn run_once(&self) -> PassReport {
        tracing::info!("job screener pass starting");
        let seen = self.store.load().await;
        let report = self.run_pass(&seen).await;

        if let Err(e) = self.store.save(&report.seen).await {
            tracing::error!(path = %self.store.path().display(), "saving seen set failed: {e:#}");
        }

        gauge!("screener_last_pass_ts").set(chrono::Utc::now().timestamp() as f64);
        tracing::info!(
            fetched = report.fetched,
            skipped_seen = report.skipped_seen,
            scored = report.scored,
            notified = report.notifications.len(),
            rejected = report.rejected,
            "job screener pass finished"
        );
        report
    }
}

/// Screen already-fetched listings. Pure apart from the scorer/notifier calls
/// and the delay between scored listings.
pub async fn screen_listings(
    listings: Vec<Listing>,
    seen: &SeenSet,
    scorer: &dyn Scorer,
    notifier: &dyn Notifier,
    opts: &PassOptions,
) -> PassReport {
    let mut report = PassReport {
        seen: seen.clone(),
        fetched: listings.len(),
        ..PassReport::default()
    };
    // urls rejected earlier in this pass (same posting listed by two sources)
    let mut rejected_urls: HashSet<String> = HashSet::new();

    for listing in listings {
        if report.seen.contains(&listing.url) || rejected_urls.contains(&listing.url) {
            tracing::info!(title = %listing.title, url = %listing.url, "skipped (duplicate)");
            counter!("screener_listings_skipped_seen_total").increment(1);
            report.skipped_seen += 1;
            continue;
        }

        if opts.max_scores.is_some_and(|cap| report.scored >= cap) {
            tracing::info!(cap = ?opts.max_scores, "reached scoring limit for this pass");
            report.cap_reached = true;
            break;
        }

        // pause between scored listings, never after the last one
        if report.scored > 0 && !opts.listing_delay.is_zero() {
            tokio::time::sleep(opts.listing_delay).await;
        }

        tracing::info!(
            title = %listing.title,
            company = listing.company_or_unknown(),
            source = %listing.source,
            "scoring listing"
        );
        let assessment = assess(scorer, &listing).await;
        report.scored += 1;
        counter!("screener_listings_scored_total").increment(1);
        tracing::info!(
            title = %listing.title,
            score = assessment.score,
            url = %listing.url,
            rationale = %assessment.rationale,
            "scored"
        );

        if assessment.passes(opts.threshold) {
            let delivered = match notifier.notify(&listing, &assessment).await {
                Ok(()) => {
                    tracing::info!(title = %listing.title, "notification sent");
                    counter!("screener_notifications_total").increment(1);
                    true
                }
                Err(e) => {
                    tracing::error!(error = ?e, title = %listing.title, "notification failed");
                    counter!("screener_notify_errors_total").increment(1);
                    false
                }
            };
            report.seen.insert(listing.url.clone());
            report.notifications.push(Notification {
                listing,
                assessment,
                delivered,
            });
        } else {
            tracing::info!(
                title = %listing.title,
                score = assessment.score,
                threshold = opts.threshold,
                "below threshold, not notified"
            );
            report.rejected += 1;
            rejected_urls.insert(listing.url);
        }
    }

    report
}
