// src/ledger.rs
//! Dedup ledger: feed id → last relayed entry id, persisted as one flat
//! JSON object. The whole mapping is rewritten on every update; a missing
//! or corrupt store loads as empty and never fails the process.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug)]
pub struct DedupLedger {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl DedupLedger {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "corrupt ledger, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, entries }
    }

    pub fn last_seen(&self, feed_id: &str) -> Option<&str> {
        self.entries.get(feed_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advance the feed's last-seen id and persist the full mapping.
    /// The id is never rolled back; callers only pass ids drawn from
    /// entries fetched after the current one.
    pub fn record_seen(&mut self, feed_id: &str, entry_id: &str) -> Result<()> {
        self.entries
            .insert(feed_id.to_string(), entry_id.to_string());
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("creating ledger dir {}", dir.display()))?;
            }
        }
        let json = serde_json::to_string(&self.entries).context("serialize ledger")?;
        write_atomic(&self.path, json.as_bytes())
            .with_context(|| format!("writing ledger to {}", self.path.display()))
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let mut f = fs::File::create(&tmp)?;
    f.write_all(bytes)?;
    fs::rename(tmp, path)?;
    Ok(())
}
