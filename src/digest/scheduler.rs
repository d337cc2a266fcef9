// src/digest/scheduler.rs
//! Summary pipeline orchestration: collect → prompt → generate → post,
//! per category, serialized by one process-wide guard.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::chat::ChatApi;
use crate::digest::chunker::post_chunks;
use crate::digest::collector::collect_channel;
use crate::digest::prompt::build_prompt;
use crate::digest::summarizer::{summarize, TextGenerator};
use crate::digest::{ChannelGroup, RunProfile};

pub struct SummaryPipeline {
    chat: Arc<dyn ChatApi>,
    generator: Arc<dyn TextGenerator>,
    groups: Vec<ChannelGroup>,
    // Single global guard: two pipeline executions never overlap, even
    // across categories writing to different output channels.
    guard: Mutex<()>,
}

impl SummaryPipeline {
    pub fn new(
        chat: Arc<dyn ChatApi>,
        generator: Arc<dyn TextGenerator>,
        groups: Vec<ChannelGroup>,
    ) -> Self {
        Self {
            chat,
            generator,
            groups,
            guard: Mutex::new(()),
        }
    }

    /// Run every configured group back-to-back inside one critical
    /// section. A concurrent caller blocks until this whole run finishes.
    pub async fn run_all(&self, profile: RunProfile) {
        let _held = self.guard.lock().await;
        for group in &self.groups {
            self.run_group(group, profile).await;
            counter!("digest_runs_total").increment(1);
        }
    }

    async fn run_group(&self, group: &ChannelGroup, profile: RunProfile) {
        let allowed: HashSet<_> = group.member_channels.iter().copied().collect();

        let mut messages = Vec::new();
        for &channel in &group.member_channels {
            let collected =
                collect_channel(&*self.chat, channel, &allowed, profile.lookback).await;
            messages.extend(collected);
        }
        tracing::info!(
            category = %group.category,
            messages = messages.len(),
            lookback_mins = profile.lookback.num_minutes(),
            "generating digest"
        );

        let prompt = build_prompt(group.category, &messages);
        let summary = summarize(&*self.generator, &prompt, profile.generate_timeout).await;

        let label = format!(
            "{}{} Summary",
            group.category.heading(),
            profile.label_suffix.unwrap_or("")
        );
        if let Err(e) = post_chunks(&*self.chat, group.output_channel, &label, &summary).await {
            tracing::warn!(category = %group.category, error = %e, "digest post incomplete");
        }
    }
}

/// Spawn the summary loop: one startup run with the extended profile,
/// then periodic runs — the first a full period after startup so the two
/// digests never land back-to-back.
pub fn spawn_summary_loop(pipeline: Arc<SummaryPipeline>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("startup digest run (24h lookback)");
        pipeline.run_all(RunProfile::startup()).await;

        let mut ticker = tokio::time::interval(period);
        ticker.tick().await; // immediate tick discarded; startup run already happened
        loop {
            ticker.tick().await;
            tracing::info!("periodic digest run");
            pipeline.run_all(RunProfile::periodic()).await;
        }
    })
}
