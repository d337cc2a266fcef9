// src/digest/prompt.rs
//! Prompt construction. Pure, no I/O — suitable for unit tests and
//! offline inspection of what the generator actually sees.

use crate::digest::collector::CollectedMessage;
use crate::digest::Category;

/// At most this many messages per channel make it into the prompt —
/// the first five encountered in collection order, not the most recent
/// five. Deliberately preserved behavior.
pub const PER_CHANNEL_MESSAGE_CAP: usize = 5;

/// Render the generation prompt for one category.
///
/// An empty input yields a fixed no-updates sentence rather than an empty
/// string; the generator is still invoked with it so the downstream flow
/// stays uniform. No length cap is applied to the rendered prompt.
pub fn build_prompt(category: Category, messages: &[CollectedMessage]) -> String {
    if messages.is_empty() {
        return format!(
            "No new updates in {} feeds.",
            category.label().to_lowercase()
        );
    }

    // Group by channel name, first-appearance order.
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for m in messages {
        match groups.iter_mut().find(|(name, _)| *name == m.channel_name) {
            Some((_, msgs)) => msgs.push(&m.text),
            None => groups.push((&m.channel_name, vec![&m.text])),
        }
    }

    let mut prompt = format!(
        "Summarize the following **{}** news. Provide 1–2 bullet points per channel. \
         Be detailed but concise. Avoid links/usernames.\n\n",
        category.label()
    );
    for (name, msgs) in &groups {
        prompt.push_str(&format!("Channel: {name}\n"));
        for m in msgs.iter().take(PER_CHANNEL_MESSAGE_CAP) {
            prompt.push_str(&format!("- {m}\n"));
        }
    }
    prompt.push_str("\nSummary:");
    prompt
}
