// tests/common/mod.rs
// In-memory implementations of the three capability traits, shared by the
// integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use newsroom_bot::chat::{ChannelId, ChannelInfo, ChatApi, HistoryMessage};
use newsroom_bot::digest::summarizer::TextGenerator;
use newsroom_bot::ingest::feed::{FeedEntry, FeedFetcher};

pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn new_event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

#[derive(Default)]
pub struct MockChat {
    pub names: HashMap<ChannelId, String>,
    pub history: HashMap<ChannelId, Vec<HistoryMessage>>,
    /// Channels whose history read errors out.
    pub unreadable: HashSet<ChannelId>,
    /// Sends succeed until this many have gone through, then fail.
    pub fail_sends_after: Option<usize>,
    pub sent: Mutex<Vec<(ChannelId, String)>>,
    pub events: Option<EventLog>,
}

impl MockChat {
    pub fn with_channels(names: &[(ChannelId, &str)]) -> Self {
        Self {
            names: names
                .iter()
                .map(|(id, n)| (*id, n.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }

    pub fn sent_to(&self, channel: ChannelId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, t)| t.clone())
            .collect()
    }
}

#[async_trait]
impl ChatApi for MockChat {
    async fn send(&self, channel: ChannelId, text: &str) -> Result<()> {
        let mut sent = self.sent.lock().unwrap();
        if let Some(cap) = self.fail_sends_after {
            if sent.len() >= cap {
                return Err(anyhow!("send rejected by mock"));
            }
        }
        sent.push((channel, text.to_string()));
        drop(sent);
        if let Some(log) = &self.events {
            log.lock().unwrap().push(format!("post:{channel}"));
        }
        Ok(())
    }

    async fn read_history(&self, channel: ChannelId, limit: usize) -> Result<Vec<HistoryMessage>> {
        if self.unreadable.contains(&channel) {
            return Err(anyhow!("history unavailable"));
        }
        let mut h = self.history.get(&channel).cloned().unwrap_or_default();
        h.truncate(limit);
        Ok(h)
    }

    async fn resolve_channel(&self, channel: ChannelId) -> Option<ChannelInfo> {
        self.names.get(&channel).map(|name| ChannelInfo {
            id: channel,
            name: name.clone(),
        })
    }
}

/// Fixed entry list, swappable between cycles.
pub struct MockFetcher {
    pub entries: Mutex<Vec<FeedEntry>>,
}

impl MockFetcher {
    pub fn new(entries: Vec<FeedEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    pub fn set_entries(&self, entries: Vec<FeedEntry>) {
        *self.entries.lock().unwrap() = entries;
    }
}

#[async_trait]
impl FeedFetcher for MockFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<FeedEntry>> {
        Ok(self.entries.lock().unwrap().clone())
    }
}

pub fn entry(id: &str) -> FeedEntry {
    FeedEntry {
        id: id.to_string(),
        title: format!("title {id}"),
        link: format!("https://example.com/{id}"),
    }
}

/// Always fails; drives the fallback path.
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str, _timeout: Duration) -> Result<String> {
        Err(anyhow!("generation timed out"))
    }
}

/// Records stage boundaries into the shared event log and yields mid-call,
/// so interleaving would be visible if the pipeline guard let it happen.
pub struct RecordingGenerator {
    pub events: EventLog,
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str, _timeout: Duration) -> Result<String> {
        let category = if prompt.to_lowercase().contains("security") {
            "security"
        } else {
            "tech"
        };
        self.events
            .lock()
            .unwrap()
            .push(format!("gen-start:{category}"));
        tokio::time::sleep(Duration::from_millis(25)).await;
        self.events
            .lock()
            .unwrap()
            .push(format!("gen-end:{category}"));
        Ok(format!("digest for {category}"))
    }
}
