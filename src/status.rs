// src/status.rs
//! Heartbeat loop: a countdown log line every five minutes so an idle
//! process is visibly alive between runs.

use std::time::Duration;

use tokio::task::JoinHandle;

const BEAT: Duration = Duration::from_secs(5 * 60);

pub fn spawn_heartbeat(feed_period: Duration, summary_period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let beat_mins = BEAT.as_secs() / 60;
        let mut feed_in = feed_period.as_secs() / 60;
        let mut summary_in = summary_period.as_secs() / 60;
        loop {
            tracing::info!(
                feed_update_in_mins = feed_in,
                summary_post_in_mins = summary_in,
                "heartbeat"
            );
            tokio::time::sleep(BEAT).await;
            feed_in = feed_in.saturating_sub(beat_mins);
            summary_in = summary_in.saturating_sub(beat_mins);
            if feed_in == 0 {
                feed_in = feed_period.as_secs() / 60;
            }
            if summary_in == 0 {
                summary_in = summary_period.as_secs() / 60;
            }
        }
    })
}
