// src/metrics.rs
use std::net::SocketAddr;

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on the exporter).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_entries_parsed_total", "Entries parsed from feeds.");
        describe_counter!(
            "feed_entries_relayed_total",
            "Unseen entries relayed to channels."
        );
        describe_counter!("feed_cycle_errors_total", "Per-feed fetch/relay failures.");
        describe_counter!("feed_runs_total", "Completed ingestion cycles.");
        describe_histogram!("feed_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!("feed_last_cycle_ts", "Unix ts of the last ingestion cycle.");
        describe_counter!("digest_runs_total", "Per-category digest executions.");
        describe_counter!(
            "digest_messages_collected_total",
            "Messages collected for digests."
        );
        describe_counter!(
            "digest_generate_failures_total",
            "Generation calls degraded to the fallback."
        );
        describe_counter!("digest_chunks_posted_total", "Digest chunks posted.");
    });
}

/// Describe all series and, when an address is configured, start the
/// Prometheus exporter with its own HTTP listener. Exporter failure is
/// logged, never fatal.
pub fn init(listen: Option<SocketAddr>) {
    ensure_metrics_described();
    let Some(addr) = listen else { return };
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(%addr, "prometheus exporter listening"),
        Err(e) => tracing::warn!(%addr, error = %e, "prometheus exporter failed to start"),
    }
}
