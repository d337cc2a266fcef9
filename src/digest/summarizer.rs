// src/digest/summarizer.rs
//! Generation backend capability and the degradation wrapper around it.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use serde::{Deserialize, Serialize};

/// Posted verbatim whenever the backend times out or errors; the pipeline
/// degrades to this instead of aborting.
pub const FALLBACK_SUMMARY: &str = "The summary backend failed to generate an update.";

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce text for `prompt`, failing on timeout/transport/decode
    /// errors. The timeout is per call, supplied by the run profile.
    async fn generate(&self, prompt: &str, timeout: Duration) -> Result<String>;
}

/// Local Ollama-style generation endpoint (`POST {endpoint}/api/generate`).
pub struct OllamaGenerator {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("newsroom-bot/0.1")
            .connect_timeout(Duration::from_secs(4))
            .build()
            .expect("reqwest client");
        Self {
            http,
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str, timeout: Duration) -> Result<String> {
        let url = format!("{}/api/generate", self.endpoint);
        let req = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        let rsp = self
            .http
            .post(&url)
            .timeout(timeout)
            .json(&req)
            .send()
            .await
            .context("generation request")?
            .error_for_status()
            .context("generation request rejected")?;
        let body: GenerateResponse = rsp.json().await.context("decode generation payload")?;
        Ok(body.response.trim().to_string())
    }
}

/// Invoke the backend, converting every failure into [`FALLBACK_SUMMARY`].
pub async fn summarize(gen: &dyn TextGenerator, prompt: &str, timeout: Duration) -> String {
    match gen.generate(prompt, timeout).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "generation failed, posting fallback");
            counter!("digest_generate_failures_total").increment(1);
            FALLBACK_SUMMARY.to_string()
        }
    }
}
