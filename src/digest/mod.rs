// src/digest/mod.rs
pub mod chunker;
pub mod collector;
pub mod prompt;
pub mod scheduler;
pub mod summarizer;

use std::fmt;
use std::time::Duration;

use crate::chat::ChannelId;

/// Named partition of channels sharing one digest destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Security,
    Tech,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Security => "Security",
            Category::Tech => "Tech",
        }
    }

    /// Heading used on posted digests.
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Security => "🛡️ Security",
            Category::Tech => "📡 Tech",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Static channel-group configuration. Membership across groups is
/// assumed disjoint; the collector additionally refuses channels outside
/// the active group's member set.
#[derive(Debug, Clone)]
pub struct ChannelGroup {
    pub category: Category,
    pub member_channels: Vec<ChannelId>,
    pub output_channel: ChannelId,
}

/// Parameters of one summary run. The startup run looks further back and
/// gives the generator more time; the label suffix marks its output.
#[derive(Debug, Clone, Copy)]
pub struct RunProfile {
    pub lookback: chrono::Duration,
    pub generate_timeout: Duration,
    pub label_suffix: Option<&'static str>,
}

impl RunProfile {
    pub fn startup() -> Self {
        Self {
            lookback: chrono::Duration::hours(24),
            generate_timeout: Duration::from_secs(90),
            label_suffix: Some(" - Last 24 Hours"),
        }
    }

    pub fn periodic() -> Self {
        Self {
            lookback: chrono::Duration::minutes(90),
            generate_timeout: Duration::from_secs(30),
            label_suffix: None,
        }
    }
}
