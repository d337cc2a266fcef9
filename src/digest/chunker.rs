// src/digest/chunker.rs
//! Splitting long digests into platform-size-bounded messages.

use anyhow::Result;
use metrics::counter;

use crate::chat::{ChannelId, ChatApi};

/// Discord hard cap per message, in characters.
pub const MESSAGE_CHAR_CAP: usize = 2000;

/// Continuation chunks carry this label instead of the digest label.
pub const CONTINUED_LABEL: &str = "(continued)";

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M";
// Same rendered width as TIMESTAMP_FMT output.
const TIMESTAMP_PLACEHOLDER: &str = "YYYY-MM-DD HH:MM";

fn frame_header(label: &str, timestamp: &str) -> String {
    format!("**{label}**\n_{timestamp}_\n")
}

/// Characters of payload that fit in one message once the header is
/// accounted for. Measured against the *first* chunk's header; the
/// continuation header is assumed to be no longer than the digest label's.
pub fn chunk_limit(label: &str) -> usize {
    MESSAGE_CHAR_CAP.saturating_sub(frame_header(label, TIMESTAMP_PLACEHOLDER).chars().count())
}

/// Contiguous, non-overlapping slices of at most `limit` characters.
/// No word-boundary awareness; mid-token splits are fine.
pub fn split_chunks(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(limit.max(1))
        .map(|c| c.iter().collect())
        .collect()
}

/// Post `text` to `channel` as an ordered sequence of framed chunks.
///
/// No-op on empty/whitespace text or an unresolvable channel. Each chunk
/// gets a freshly formatted local timestamp. A failure mid-sequence
/// propagates without retracting chunks already posted.
pub async fn post_chunks(
    chat: &dyn ChatApi,
    channel: ChannelId,
    label: &str,
    text: &str,
) -> Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }
    if chat.resolve_channel(channel).await.is_none() {
        tracing::debug!(channel, "output channel unresolved, dropping digest");
        return Ok(());
    }

    let limit = chunk_limit(label);
    for (i, chunk) in split_chunks(text, limit).iter().enumerate() {
        let title = if i == 0 { label } else { CONTINUED_LABEL };
        let timestamp = chrono::Local::now().format(TIMESTAMP_FMT).to_string();
        let message = format!("{}{}", frame_header(title, &timestamp), chunk);
        chat.send(channel, &message).await?;
        counter!("digest_chunks_posted_total").increment(1);
    }
    Ok(())
}
