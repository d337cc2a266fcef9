//! Newsroom bot — binary entrypoint.
//! Wires configuration, the chat/feed/generation capabilities, and the two
//! periodic loops (feed relay, digest posting) plus the heartbeat.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsroom_bot::chat::{wait_for_session, ChatApi, DiscordRest};
use newsroom_bot::digest::scheduler::{spawn_summary_loop, SummaryPipeline};
use newsroom_bot::digest::summarizer::{OllamaGenerator, TextGenerator};
use newsroom_bot::ingest::feed::{FeedFetcher, HttpFeedFetcher};
use newsroom_bot::ingest::scheduler::{spawn_ingest_loop, IngestSchedulerCfg};
use newsroom_bot::ledger::DedupLedger;
use newsroom_bot::{config, metrics, status};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("newsroom_bot=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = config::load_default()?;
    metrics::init(cfg.metrics_listen);

    let token = std::env::var("DISCORD_TOKEN").context("DISCORD_TOKEN is not set")?;
    let chat: Arc<dyn ChatApi> = Arc::new(DiscordRest::new(token));
    let fetcher: Arc<dyn FeedFetcher> = Arc::new(HttpFeedFetcher::new());
    let generator: Arc<dyn TextGenerator> = Arc::new(OllamaGenerator::new(
        cfg.generator_endpoint.clone(),
        cfg.generator_model.clone(),
    ));
    let ledger = DedupLedger::load(&cfg.ledger_path);
    tracing::info!(
        feeds = cfg.feeds.len(),
        groups = cfg.groups.len(),
        known_feeds = ledger.len(),
        "configuration loaded"
    );

    // Both loops are gated on the platform answering at all.
    let probe = cfg
        .groups
        .first()
        .map(|g| g.output_channel)
        .context("no channel groups configured")?;
    wait_for_session(&*chat, probe).await;

    let ingest_handle = spawn_ingest_loop(
        IngestSchedulerCfg {
            period: cfg.feed_period(),
        },
        cfg.feed_sources(),
        Arc::clone(&chat),
        fetcher,
        ledger,
    );

    let pipeline = Arc::new(SummaryPipeline::new(
        Arc::clone(&chat),
        generator,
        cfg.channel_groups(),
    ));
    let summary_handle = spawn_summary_loop(pipeline, cfg.summary_period());
    let heartbeat_handle = status::spawn_heartbeat(cfg.feed_period(), cfg.summary_period());

    tracing::info!("newsroom bot running");
    tokio::signal::ctrl_c().await.context("ctrl-c handler")?;
    tracing::info!("shutting down");

    ingest_handle.abort();
    summary_handle.abort();
    heartbeat_handle.abort();
    Ok(())
}
