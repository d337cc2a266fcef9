// src/ingest/scheduler.rs
use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, gauge};
use tokio::task::JoinHandle;

use crate::chat::ChatApi;
use crate::ingest::feed::FeedFetcher;
use crate::ingest::FeedSource;
use crate::ledger::DedupLedger;

#[derive(Clone, Copy, Debug)]
pub struct IngestSchedulerCfg {
    pub period: Duration,
}

/// Outcome of one full pass over the configured feeds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    pub relayed: usize,
    pub failed: usize,
}

/// One pass over every configured feed. A failing feed is logged and
/// counted; the remaining feeds still run.
pub async fn run_cycle(
    feeds: &[FeedSource],
    chat: &dyn ChatApi,
    fetcher: &dyn FeedFetcher,
    ledger: &mut DedupLedger,
) -> CycleOutcome {
    let mut outcome = CycleOutcome::default();
    for feed in feeds {
        match crate::ingest::ingest_feed(chat, fetcher, ledger, feed).await {
            Ok(n) => outcome.relayed += n,
            Err(e) => {
                outcome.failed += 1;
                tracing::warn!(feed = %feed.id, error = ?e, "feed cycle failed");
                counter!("feed_cycle_errors_total").increment(1);
            }
        }
    }

    counter!("feed_runs_total").increment(1);
    gauge!("feed_last_cycle_ts").set(chrono::Utc::now().timestamp() as f64);
    tracing::info!(
        target: "ingest",
        feeds = feeds.len(),
        relayed = outcome.relayed,
        failed = outcome.failed,
        "feed cycle complete"
    );
    outcome
}

/// Spawn the ingestion loop: an eager first cycle, then one cycle per
/// period. Feeds are processed in configured order. The ledger is owned
/// by this task — the single writer.
pub fn spawn_ingest_loop(
    cfg: IngestSchedulerCfg,
    feeds: Vec<FeedSource>,
    chat: Arc<dyn ChatApi>,
    fetcher: Arc<dyn FeedFetcher>,
    mut ledger: DedupLedger,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(cfg.period);
        loop {
            ticker.tick().await;
            run_cycle(&feeds, &*chat, &*fetcher, &mut ledger).await;
        }
    })
}
