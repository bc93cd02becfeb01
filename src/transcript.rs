//! The ordered message log, read from a JSON file.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context as _};
use serde_json::Value;
use tracing::{info, warn};

use crate::model::Message;

pub fn load(path: &Path) -> anyhow::Result<Vec<Message>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript {}", path.display()))?;
    let messages = parse(&raw).with_context(|| format!("Invalid transcript at {}", path.display()))?;
    info!(path = %path.display(), messages = messages.len(), "loaded transcript");
    Ok(messages)
}

/// Parse a transcript: an array of messages, or `{"messages": [...]}`.
/// Entries that are not messages are skipped with a warning.
pub fn parse(raw: &str) -> anyhow::Result<Vec<Message>> {
    let value: Value = serde_json::from_str(raw).context("Transcript is not JSON")?;
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut obj) => match obj.remove("messages") {
            Some(Value::Array(entries)) => entries,
            _ => bail!("Transcript object has no `messages` array"),
        },
        _ => bail!("Transcript must be an array of messages"),
    };
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match Message::try_from(entry) {
            Ok(message) => Some(message),
            Err(err) => {
                warn!(index = idx, error = %err, "skipping transcript entry");
                None
            }
        })
        .collect())
}
