// src/chat.rs
//! Chat platform capability: everything the pipelines need from Discord,
//! behind a trait so tests can run against an in-memory implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discord snowflake, kept as a plain integer (configuration supplies them).
pub type ChannelId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct HistoryMessage {
    pub created_at: DateTime<Utc>,
    pub text: String,
}

#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Post one message. One attempt, no retry: a failed relay is the
    /// caller's problem to contain.
    async fn send(&self, channel: ChannelId, text: &str) -> Result<()>;

    /// Recent messages for a channel, platform-native order (newest first),
    /// at most `limit` items.
    async fn read_history(&self, channel: ChannelId, limit: usize) -> Result<Vec<HistoryMessage>>;

    /// Channel lookup; `None` when the channel is unknown or unreadable.
    async fn resolve_channel(&self, channel: ChannelId) -> Option<ChannelInfo>;
}

/// Discord REST v10 client authenticated with a bot token.
pub struct DiscordRest {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl DiscordRest {
    pub fn new(token: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("newsroom-bot/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url: "https://discord.com/api/v10".to_string(),
            token,
        }
    }

    /// Point the client at a different API root (local stub in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn auth(&self) -> String {
        format!("Bot {}", self.token)
    }
}

#[derive(Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiMessage {
    id: String,
    content: String,
    timestamp: String,
}

#[derive(Deserialize)]
struct ApiChannel {
    name: Option<String>,
}

#[async_trait]
impl ChatApi for DiscordRest {
    async fn send(&self, channel: ChannelId, text: &str) -> Result<()> {
        let url = format!("{}/channels/{}/messages", self.base_url, channel);
        let rsp = self
            .http
            .post(&url)
            .header("Authorization", self.auth())
            .json(&CreateMessage { content: text })
            .send()
            .await
            .with_context(|| format!("send to channel {channel}"))?;
        rsp.error_for_status()
            .with_context(|| format!("send to channel {channel} rejected"))?;
        Ok(())
    }

    async fn read_history(&self, channel: ChannelId, limit: usize) -> Result<Vec<HistoryMessage>> {
        // The messages endpoint caps `limit` at 100 per request and
        // rejects anything larger, so deeper reads page backwards with
        // the `before` cursor.
        const PAGE_CAP: usize = 100;

        let url = format!("{}/channels/{}/messages", self.base_url, channel);
        let mut messages: Vec<HistoryMessage> = Vec::new();
        let mut before: Option<String> = None;

        while messages.len() < limit {
            let page = (limit - messages.len()).min(PAGE_CAP);
            let mut req = self
                .http
                .get(&url)
                .header("Authorization", self.auth())
                .query(&[("limit", page.to_string())]);
            if let Some(cursor) = &before {
                req = req.query(&[("before", cursor.clone())]);
            }
            let rsp = req
                .send()
                .await
                .with_context(|| format!("read history of channel {channel}"))?
                .error_for_status()
                .with_context(|| format!("history read of channel {channel} rejected"))?;

            let raw: Vec<ApiMessage> = rsp.json().await.context("decode history payload")?;
            let batch = raw.len();
            before = raw.last().map(|m| m.id.clone());
            messages.extend(raw.into_iter().filter_map(|m| {
                let created_at = DateTime::parse_from_rfc3339(&m.timestamp)
                    .ok()?
                    .with_timezone(&Utc);
                Some(HistoryMessage {
                    created_at,
                    text: m.content,
                })
            }));
            if batch < page {
                break; // history exhausted
            }
        }
        Ok(messages)
    }

    async fn resolve_channel(&self, channel: ChannelId) -> Option<ChannelInfo> {
        let url = format!("{}/channels/{}", self.base_url, channel);
        let rsp = self
            .http
            .get(&url)
            .header("Authorization", self.auth())
            .send()
            .await
            .ok()?
            .error_for_status()
            .ok()?;
        let api: ApiChannel = rsp.json().await.ok()?;
        Some(ChannelInfo {
            id: channel,
            name: api.name.unwrap_or_else(|| channel.to_string()),
        })
    }
}

/// Block until the platform answers for `probe`, polling every 10s.
/// Both scheduler loops start only after this returns.
pub async fn wait_for_session(chat: &dyn ChatApi, probe: ChannelId) {
    loop {
        if let Some(info) = chat.resolve_channel(probe).await {
            tracing::info!(channel = %info.name, "chat session ready");
            return;
        }
        tracing::warn!(probe, "chat session not ready yet, retrying in 10s");
        tokio::time::sleep(Duration::from_secs(10)).await;
    }
}
