// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod chat;
pub mod config;
pub mod digest;
pub mod ingest;
pub mod ledger;
pub mod metrics;
pub mod status;

// ---- Re-exports for stable public API ----
pub use crate::chat::{ChannelId, ChannelInfo, ChatApi, DiscordRest, HistoryMessage};
pub use crate::digest::scheduler::SummaryPipeline;
pub use crate::digest::{Category, ChannelGroup, RunProfile};
pub use crate::ingest::feed::{FeedEntry, FeedFetcher, HttpFeedFetcher};
pub use crate::ingest::FeedSource;
pub use crate::ledger::DedupLedger;
