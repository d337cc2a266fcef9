// src/ingest/mod.rs
pub mod feed;
pub mod scheduler;

use anyhow::Result;
use metrics::counter;

use crate::chat::ChatApi;
use crate::ingest::feed::{FeedEntry, FeedFetcher};
use crate::ledger::DedupLedger;

/// How many of a feed's newest entries one cycle looks at. A feed that
/// publishes more than this between cycles loses the overflow.
pub const MAX_SCAN: usize = 5;

/// One configured syndication source bound to a relay channel.
#[derive(Debug, Clone)]
pub struct FeedSource {
    pub id: String,
    pub url: String,
    pub channel_id: crate::chat::ChannelId,
}

/// Select the unseen prefix of `entries` (newest first): walk at most
/// [`MAX_SCAN`] entries, stopping before the one matching `last_seen`.
/// No last-seen record means everything scanned is unseen (first run
/// floods once).
pub fn unseen_entries(entries: &[FeedEntry], last_seen: Option<&str>) -> Vec<FeedEntry> {
    let mut unseen = Vec::new();
    for entry in entries.iter().take(MAX_SCAN) {
        if last_seen == Some(entry.id.as_str()) {
            break;
        }
        unseen.push(entry.clone());
    }
    unseen
}

/// Relay payload: bolded title, then the link.
pub fn relay_text(entry: &FeedEntry) -> String {
    format!("**{}**\n{}", entry.title, entry.link)
}

/// One ingestion pass for one feed: fetch, select unseen, relay oldest
/// first, then advance and persist the ledger.
///
/// A send failure aborts the remaining relays for this feed this cycle,
/// but the ledger still advances to the newest collected id — relayed
/// entries are never re-posted, un-relayed ones are dropped. The crash
/// window is relay-before-persist: dying in between re-relays the same
/// entries next start (at-least-once, never at-most-once).
pub async fn ingest_feed(
    chat: &dyn ChatApi,
    fetcher: &dyn FeedFetcher,
    ledger: &mut DedupLedger,
    feed: &FeedSource,
) -> Result<usize> {
    let entries = fetcher.fetch(&feed.url).await?;
    let unseen = unseen_entries(&entries, ledger.last_seen(&feed.id));
    if unseen.is_empty() {
        return Ok(0);
    }

    let mut relayed = 0usize;
    for entry in unseen.iter().rev() {
        match chat.send(feed.channel_id, &relay_text(entry)).await {
            Ok(()) => {
                tracing::info!(feed = %feed.id, title = %entry.title, "relayed entry");
                relayed += 1;
            }
            Err(e) => {
                tracing::warn!(feed = %feed.id, error = %e, "relay failed, skipping rest of feed this cycle");
                break;
            }
        }
    }
    counter!("feed_entries_relayed_total").increment(relayed as u64);

    // Newest collected id wins even if some sends failed above.
    ledger.record_seen(&feed.id, &unseen[0].id)?;
    Ok(relayed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> FeedEntry {
        FeedEntry {
            id: id.to_string(),
            title: format!("title {id}"),
            link: format!("https://example.com/{id}"),
        }
    }

    #[test]
    fn stops_before_last_seen() {
        // n5 newest … n1 oldest, ledger sits at n3.
        let entries: Vec<_> = ["n5", "n4", "n3", "n2", "n1"].iter().map(|i| entry(i)).collect();
        let unseen = unseen_entries(&entries, Some("n3"));
        let ids: Vec<_> = unseen.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["n5", "n4"]);
    }

    #[test]
    fn no_record_floods_at_most_max_scan() {
        let entries: Vec<_> = ["a", "b", "c", "d", "e", "f", "g"]
            .iter()
            .map(|i| entry(i))
            .collect();
        let unseen = unseen_entries(&entries, None);
        assert_eq!(unseen.len(), MAX_SCAN);
        assert_eq!(unseen[0].id, "a");
    }

    #[test]
    fn up_to_date_feed_yields_nothing() {
        let entries: Vec<_> = ["a", "b"].iter().map(|i| entry(i)).collect();
        assert!(unseen_entries(&entries, Some("a")).is_empty());
    }

    #[test]
    fn relay_text_is_bold_title_then_link() {
        let e = entry("x");
        assert_eq!(relay_text(&e), "**title x**\nhttps://example.com/x");
    }
}
