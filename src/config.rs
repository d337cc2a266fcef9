// src/config.rs
//! Structural configuration: feeds, channel groups, intervals, endpoints.
//! Loaded once at startup from TOML; secrets stay in the environment.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::chat::ChannelId;
use crate::digest::{Category, ChannelGroup};
use crate::ingest::FeedSource;

const ENV_PATH: &str = "NEWSROOM_CONFIG_PATH";
const DEFAULT_PATH: &str = "config/newsroom.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,
    /// Prometheus exporter listen address; no exporter when absent.
    #[serde(default)]
    pub metrics_listen: Option<SocketAddr>,
    #[serde(default = "default_feed_interval_mins")]
    pub feed_interval_mins: u64,
    #[serde(default = "default_summary_interval_mins")]
    pub summary_interval_mins: u64,
    #[serde(default = "default_generator_endpoint")]
    pub generator_endpoint: String,
    #[serde(default = "default_generator_model")]
    pub generator_model: String,
    pub feeds: Vec<FeedConfig>,
    pub groups: Vec<GroupConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub id: String,
    pub url: String,
    pub channel_id: ChannelId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupConfig {
    pub category: Category,
    pub member_channels: Vec<ChannelId>,
    pub output_channel: ChannelId,
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("state/last_seen_entries.json")
}
fn default_feed_interval_mins() -> u64 {
    30
}
fn default_summary_interval_mins() -> u64 {
    90
}
fn default_generator_endpoint() -> String {
    "http://localhost:11434".to_string()
}
fn default_generator_model() -> String {
    "mistral".to_string()
}

impl BotConfig {
    pub fn feed_sources(&self) -> Vec<FeedSource> {
        self.feeds
            .iter()
            .map(|f| FeedSource {
                id: f.id.clone(),
                url: f.url.clone(),
                channel_id: f.channel_id,
            })
            .collect()
    }

    pub fn channel_groups(&self) -> Vec<ChannelGroup> {
        self.groups
            .iter()
            .map(|g| ChannelGroup {
                category: g.category,
                member_channels: g.member_channels.clone(),
                output_channel: g.output_channel,
            })
            .collect()
    }

    pub fn feed_period(&self) -> Duration {
        Duration::from_secs(self.feed_interval_mins * 60)
    }

    pub fn summary_period(&self) -> Duration {
        Duration::from_secs(self.summary_interval_mins * 60)
    }
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<BotConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let cfg: BotConfig =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}

/// Load using `$NEWSROOM_CONFIG_PATH`, falling back to
/// `config/newsroom.toml`.
pub fn load_default() -> Result<BotConfig> {
    let path = std::env::var(ENV_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_PATH));
    load_from(&path)
}
