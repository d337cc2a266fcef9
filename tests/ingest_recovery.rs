// tests/ingest_recovery.rs
// Failure-window behavior: relay happens before the ledger persists, so a
// crash in between re-relays on restart (at-least-once, by design), while
// a send failure mid-cycle advances the ledger anyway (no rollback).

mod common;

use common::{entry, MockChat, MockFetcher};
use newsroom_bot::ingest::{ingest_feed, FeedSource};
use newsroom_bot::ledger::DedupLedger;

fn feed() -> FeedSource {
    FeedSource {
        id: "cisa".to_string(),
        url: "https://www.cisa.gov/news.xml".to_string(),
        channel_id: 42,
    }
}

#[tokio::test]
async fn crash_before_persist_re_relays_same_entries() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("ledger.json");
    std::fs::write(&store, r#"{"cisa":"n3"}"#).unwrap();

    let fetcher =
        MockFetcher::new(["n5", "n4", "n3", "n2"].iter().map(|i| entry(i)).collect());
    let chat = MockChat::with_channels(&[(42, "cisa")]);

    // First run persists to a scratch path: equivalent to crashing after
    // the sends but before the real store was rewritten.
    let scratch = dir.path().join("scratch.json");
    std::fs::copy(&store, &scratch).unwrap();
    let mut doomed = DedupLedger::load(&scratch);
    ingest_feed(&chat, &fetcher, &mut doomed, &feed()).await.unwrap();
    assert_eq!(chat.sent_to(42).len(), 2);

    // Restart: the real store still says n3, so n4 and n5 go out again.
    let mut ledger = DedupLedger::load(&store);
    ingest_feed(&chat, &fetcher, &mut ledger, &feed()).await.unwrap();

    let sent = chat.sent_to(42);
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[0], sent[2]);
    assert_eq!(sent[1], sent[3]);
    assert_eq!(ledger.last_seen("cisa"), Some("n5"));
}

#[tokio::test]
async fn send_failure_aborts_rest_of_cycle_without_rollback() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("ledger.json");
    std::fs::write(&store, r#"{"cisa":"n3"}"#).unwrap();
    let mut ledger = DedupLedger::load(&store);

    let fetcher =
        MockFetcher::new(["n5", "n4", "n3"].iter().map(|i| entry(i)).collect());
    let mut chat = MockChat::with_channels(&[(42, "cisa")]);
    chat.fail_sends_after = Some(1); // n4 lands, n5 is rejected

    let relayed = ingest_feed(&chat, &fetcher, &mut ledger, &feed()).await.unwrap();
    assert_eq!(relayed, 1);
    assert_eq!(chat.sent_to(42).len(), 1);
    // The ledger still advanced to the newest collected entry: n5 is
    // dropped, not retried next cycle.
    assert_eq!(ledger.last_seen("cisa"), Some("n5"));

    let mut chat_ok = MockChat::with_channels(&[(42, "cisa")]);
    chat_ok.fail_sends_after = None;
    let relayed = ingest_feed(&chat_ok, &fetcher, &mut ledger, &feed()).await.unwrap();
    assert_eq!(relayed, 0);
    assert!(chat_ok.sent_to(42).is_empty());
}

#[tokio::test]
async fn fetch_failure_leaves_ledger_untouched() {
    use anyhow::anyhow;
    use async_trait::async_trait;
    use newsroom_bot::ingest::feed::{FeedEntry, FeedFetcher};

    struct BrokenFetcher;

    #[async_trait]
    impl FeedFetcher for BrokenFetcher {
        async fn fetch(&self, _url: &str) -> anyhow::Result<Vec<FeedEntry>> {
            Err(anyhow!("dns failure"))
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("ledger.json");
    std::fs::write(&store, r#"{"cisa":"n3"}"#).unwrap();
    let mut ledger = DedupLedger::load(&store);

    let chat = MockChat::with_channels(&[(42, "cisa")]);
    let result = ingest_feed(&chat, &BrokenFetcher, &mut ledger, &feed()).await;

    assert!(result.is_err());
    assert!(chat.sent_to(42).is_empty());
    assert_eq!(ledger.last_seen("cisa"), Some("n3"));
}
