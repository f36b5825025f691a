//! Sends one sample listing through the configured webhook, so the chat side
//! can be checked without waiting for a real pass.

use job_screener::notify::{format_message, WebhookNotifier};
use job_screener::{build_http_client, Assessment, Listing, Notifier};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let url = std::env::var("WEBHOOK_URL")
        .map_err(|_| anyhow::anyhow!("Missing WEBHOOK_URL env var"))?;
    let notifier = WebhookNotifier::new(url, build_http_client()?);

    let listing = Listing {
        source: "probe".into(),
        title: "Senior Data Scientist (probe)".into(),
        company: Some("Example Co".into()),
        description: "Sample listing sent by webhook-probe.".into(),
        url: "https://example.com/jobs/probe".into(),
    };
    let assessment = Assessment {
        score: 8,
        rationale: "Probe message, not a real listing.".into(),
    };

    tracing::info!(message = %format_message(&listing, &assessment), "sending probe");
    notifier.notify(&listing, &assessment).await?;
    println!("webhook-probe done");
    Ok(())
}
