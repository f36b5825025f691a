// tests/runner_pass.rs
use anyhow::{anyhow, Result};
use job_screener::runner::screen_listings;
use job_screener::{
    Assessment, JobSource, Listing, Notifier, PassOptions, Scorer, Screener, SeenSet, SeenStore,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn listing(title: &str, url: &str) -> Listing {
    Listing {
        source: "fixed".into(),
        title: title.into(),
        company: None,
        description: format!("{title} description"),
        url: url.into(),
    }
}

fn opts() -> PassOptions {
    PassOptions {
        threshold: 7,
        listing_delay: Duration::ZERO,
        max_scores: None,
    }
}

struct FixedSource(Vec<Listing>);

#[async_trait::async_trait]
impl JobSource for FixedSource {
    async fn fetch_listings(&self) -> Result<Vec<Listing>> {
        Ok(self.0.clone())
    }
    fn name(&self) -> &'static str {
        "fixed"
    }
}

struct BrokenSource;

#[async_trait::async_trait]
impl JobSource for BrokenSource {
    async fn fetch_listings(&self) -> Result<Vec<Listing>> {
        Err(anyhow!("connection reset"))
    }
    fn name(&self) -> &'static str {
        "broken"
    }
}

/// Scores by url; urls not in the table make the call fail.
#[derive(Clone, Default)]
struct TableScorer {
    scores: HashMap<String, u8>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl TableScorer {
    fn with(pairs: &[(&str, u8)]) -> Self {
        Self {
            scores: pairs.iter().map(|(u, s)| (u.to_string(), *s)).collect(),
            calls: Arc::default(),
        }
    }
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Scorer for TableScorer {
    async fn score(&self, listing: &Listing) -> Result<Assessment> {
        self.calls.lock().unwrap().push(listing.url.clone());
        let score = self
            .scores
            .get(&listing.url)
            .copied()
            .ok_or_else(|| anyhow!("model unavailable"))?;
        Ok(Assessment::from_response(&format!(
            "Score: {score}/10\nReason: table"
        )))
    }
    fn name(&self) -> &'static str {
        "table"
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    fail: bool,
    calls: Arc<Mutex<Vec<(String, u8)>>>,
}

impl RecordingNotifier {
    fn calls(&self) -> Vec<(String, u8)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, listing: &Listing, assessment: &Assessment) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((listing.url.clone(), assessment.score));
        if self.fail {
            Err(anyhow!("webhook 500"))
        } else {
            Ok(())
        }
    }
}

#[tokio::test]
async fn senior_data_scientist_scoring_8_is_notified_and_marked_seen() {
    let scorer = TableScorer::with(&[("https://jobs/1", 8)]);
    let notifier = RecordingNotifier::default();

    let report = screen_listings(
        vec![listing("Senior Data Scientist", "https://jobs/1")],
        &SeenSet::new(),
        &scorer,
        &notifier,
        &opts(),
    )
    .await;

    assert_eq!(notifier.calls(), vec![("https://jobs/1".to_string(), 8)]);
    assert_eq!(report.seen, SeenSet::from(["https://jobs/1".to_string()]));
    assert_eq!(report.notifications.len(), 1);
    assert!(report.notifications[0].delivered);
}

#[tokio::test]
async fn seen_listings_never_reach_scorer_or_notifier() {
    let scorer = TableScorer::with(&[("https://jobs/1", 9), ("https://jobs/2", 9)]);
    let notifier = RecordingNotifier::default();
    let seen = SeenSet::from(["https://jobs/1".to_string()]);

    let report = screen_listings(
        vec![
            listing("Data Lead", "https://jobs/1"),
            listing("Data Manager", "https://jobs/2"),
        ],
        &seen,
        &scorer,
        &notifier,
        &opts(),
    )
    .await;

    assert_eq!(scorer.calls(), vec!["https://jobs/2".to_string()]);
    assert_eq!(notifier.calls().len(), 1);
    assert_eq!(report.skipped_seen, 1);
    assert!(report.seen.contains("https://jobs/1"));
    assert!(report.seen.contains("https://jobs/2"));
}

#[tokio::test]
async fn low_scores_are_not_notified_nor_remembered() {
    let scorer = TableScorer::with(&[("https://jobs/low", 6), ("https://jobs/edge", 7)]);
    let notifier = RecordingNotifier::default();

    let report = screen_listings(
        vec![
            listing("Junior Data Analyst", "https://jobs/low"),
            listing("Data Scientist", "https://jobs/edge"),
        ],
        &SeenSet::new(),
        &scorer,
        &notifier,
        &opts(),
    )
    .await;

    assert_eq!(notifier.calls(), vec![("https://jobs/edge".to_string(), 7)]);
    assert!(!report.seen.contains("https://jobs/low"));
    assert!(report.seen.contains("https://jobs/edge"));
    assert_eq!(report.rejected, 1);
}

#[tokio::test]
async fn scoring_failure_counts_as_zero() {
    // no table entry → scorer errors
    let scorer = TableScorer::with(&[]);
    let notifier = RecordingNotifier::default();

    let report = screen_listings(
        vec![listing("Senior Data Scientist", "https://jobs/err")],
        &SeenSet::new(),
        &scorer,
        &notifier,
        &opts(),
    )
    .await;

    assert_eq!(scorer.calls().len(), 1);
    assert!(notifier.calls().is_empty());
    assert!(report.seen.is_empty());
    assert_eq!(report.rejected, 1);
}

#[tokio::test]
async fn failed_notification_still_marks_seen() {
    let scorer = TableScorer::with(&[("https://jobs/1", 9)]);
    let notifier = RecordingNotifier {
        fail: true,
        ..Default::default()
    };

    let report = screen_listings(
        vec![listing("Senior Data Scientist", "https://jobs/1")],
        &SeenSet::new(),
        &scorer,
        &notifier,
        &opts(),
    )
    .await;

    assert_eq!(notifier.calls().len(), 1);
    assert!(report.seen.contains("https://jobs/1"));
    assert!(!report.notifications[0].delivered);
}

#[tokio::test]
async fn scoring_cap_stops_the_pass() {
    let scorer = TableScorer::with(&[("https://a", 1), ("https://b", 1), ("https://c", 9)]);
    let notifier = RecordingNotifier::default();
    let capped = PassOptions {
        max_scores: Some(2),
        ..opts()
    };

    let report = screen_listings(
        vec![
            listing("Data A", "https://a"),
            listing("Data B", "https://b"),
            listing("Data C", "https://c"),
        ],
        &SeenSet::new(),
        &scorer,
        &notifier,
        &capped,
    )
    .await;

    assert_eq!(scorer.calls().len(), 2);
    assert!(report.cap_reached);
    assert!(notifier.calls().is_empty());
}

#[tokio::test]
async fn same_url_from_two_sources_is_handled_once() {
    let scorer = TableScorer::with(&[("https://dup", 9), ("https://dup-low", 2)]);
    let notifier = RecordingNotifier::default();

    let report = screen_listings(
        vec![
            listing("Data Scientist", "https://dup"),
            listing("Data Scientist (mirror)", "https://dup"),
            listing("Data Clerk", "https://dup-low"),
            listing("Data Clerk (mirror)", "https://dup-low"),
        ],
        &SeenSet::new(),
        &scorer,
        &notifier,
        &opts(),
    )
    .await;

    assert_eq!(notifier.calls().len(), 1);
    assert_eq!(scorer.calls().len(), 2);
    assert_eq!(report.skipped_seen, 2);
}

#[tokio::test]
async fn second_run_over_same_feed_sends_nothing_new() {
    let dir = tempfile::tempdir().unwrap();
    let seen_path = dir.path().join("seen_jobs.json");

    let feed = vec![
        listing("Senior Data Scientist", "https://jobs/1"),
        listing("Data Entry", "https://jobs/2"),
    ];
    let scorer = TableScorer::with(&[("https://jobs/1", 8), ("https://jobs/2", 3)]);
    let notifier = RecordingNotifier::default();

    let sources: Vec<Box<dyn JobSource>> = vec![Box::new(BrokenSource), Box::new(FixedSource(feed))];
    let screener = Screener::new(
        sources,
        Box::new(scorer.clone()),
        Box::new(notifier.clone()),
        SeenStore::new(&seen_path),
        opts(),
    );

    let first = screener.run_once().await;
    assert_eq!(first.notifications.len(), 1);
    assert_eq!(first.fetched, 2);

    let persisted: Vec<String> =
        serde_json::from_str(&std::fs::read_to_string(&seen_path).unwrap()).unwrap();
    assert_eq!(persisted, vec!["https://jobs/1".to_string()]);

    let second = screener.run_once().await;
    assert!(second.notifications.is_empty());
    assert_eq!(notifier.calls().len(), 1);
    // the low scorer is reconsidered on every run
    assert_eq!(
        scorer.calls(),
        vec![
            "https://jobs/1".to_string(),
            "https://jobs/2".to_string(),
            "https://jobs/2".to_string()
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn delay_only_separates_scored_listings() {
    let scorer = TableScorer::with(&[("https://a", 1), ("https://b", 1), ("https://c", 1)]);
    let notifier = RecordingNotifier::default();
    let slow = PassOptions {
        listing_delay: Duration::from_secs(20),
        ..opts()
    };
    let seen = SeenSet::from(["https://seen".to_string()]);

    let t0 = tokio::time::Instant::now();
    screen_listings(
        vec![
            listing("Data A", "https://a"),
            listing("Data Seen", "https://seen"),
            listing("Data B", "https://b"),
            listing("Data C", "https://c"),
        ],
        &seen,
        &scorer,
        &notifier,
        &slow,
    )
    .await;
    // three scored, two gaps, nothing after the last
    let waited = t0.elapsed();
    assert!(waited >= Duration::from_secs(40), "waited {waited:?}");
    assert!(waited < Duration::from_secs(41), "waited {waited:?}");
}

#[tokio::test(start_paused = true)]
async fn single_scored_listing_does_not_wait() {
    let scorer = TableScorer::with(&[("https://a", 9)]);
    let notifier = RecordingNotifier::default();
    let slow = PassOptions {
        listing_delay: Duration::from_secs(20),
        ..opts()
    };

    let t0 = tokio::time::Instant::now();
    let report = screen_listings(
        vec![listing("Data A", "https://a")],
        &SeenSet::new(),
        &scorer,
        &notifier,
        &slow,
    )
    .await;
    assert_eq!(report.scored, 1);
    assert!(t0.elapsed() < Duration::from_secs(1), "waited {:?}", t0.elapsed());
}
