// src/digest/collector.rs
//! Recent-activity collection for one channel of a summary run.

use std::collections::HashSet;

use metrics::counter;

use crate::chat::{ChannelId, ChatApi};

/// Upper bound on history items scanned per channel (cost control).
pub const HISTORY_SCAN_LIMIT: usize = 200;

#[derive(Debug, Clone)]
pub struct CollectedMessage {
    pub channel_name: String,
    pub channel_id: ChannelId,
    pub text: String,
}

/// Collect recent non-empty messages from `channel`.
///
/// Returns empty when the channel is not in the group's allowed set
/// (containment against cross-category leakage), when it cannot be
/// resolved, or when the history read fails — a bad channel never stops
/// the run.
pub async fn collect_channel(
    chat: &dyn ChatApi,
    channel: ChannelId,
    allowed: &HashSet<ChannelId>,
    lookback: chrono::Duration,
) -> Vec<CollectedMessage> {
    if !allowed.contains(&channel) {
        tracing::debug!(channel, "channel outside group, skipping");
        return Vec::new();
    }

    let Some(info) = chat.resolve_channel(channel).await else {
        tracing::debug!(channel, "channel unresolved, skipping");
        return Vec::new();
    };

    let history = match chat.read_history(channel, HISTORY_SCAN_LIMIT).await {
        Ok(h) => h,
        Err(e) => {
            tracing::warn!(channel = %info.name, error = %e, "history read failed");
            return Vec::new();
        }
    };

    let cutoff = chrono::Utc::now() - lookback;
    let messages: Vec<CollectedMessage> = history
        .into_iter()
        .filter(|m| m.created_at >= cutoff && !m.text.trim().is_empty())
        .map(|m| CollectedMessage {
            channel_name: info.name.clone(),
            channel_id: channel,
            text: m.text.trim().to_string(),
        })
        .collect();

    counter!("digest_messages_collected_total").increment(messages.len() as u64);
    tracing::debug!(channel = %info.name, count = messages.len(), "collected messages");
    messages
}
