//! Source preview: fetch a cited page, summarize it into blocks, and degrade
//! to raw markup or an advisory when a step fails.
//!
//! # Submodules
//!
//! - `pipeline`: the per-selection state machine and its stale-response guard
//! - `backend`: HTTP client for the remote fetch/summarize/corpus service
//! - `direct`: fetcher that downloads pages itself when no backend is configured
//! - `readability`: local summarizer used with the direct fetcher
//! - `markup`: markup to plain text for the raw-markup pane

pub mod backend;
pub mod direct;
pub mod markup;
pub mod pipeline;
pub mod readability;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::model::PreviewBlock;

pub use backend::HttpBackend;
pub use direct::DirectFetcher;
pub use pipeline::{PreviewPhase, PreviewPipeline, PreviewState, PreviewUpdate};
pub use readability::ReadabilitySummarizer;

/// What the content fetch returns. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FetchedContent {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote returned status {0}")]
    Status(u16),
    #[error("malformed fetch response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote returned status {0}")]
    Status(u16),
    #[error("malformed summary: {0}")]
    Parse(String),
}

/// Retrieves raw markup for a URL.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedContent, FetchError>;
}

/// Turns raw markup into ordered blocks. Holes (`None`) are allowed and are
/// filtered by the pipeline.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, html: &str) -> Result<Vec<Option<PreviewBlock>>, SummarizeError>;
}

/// Decode a summary payload: a bare array of blocks or `{"blocks": [...]}`.
pub fn parse_blocks(value: &serde_json::Value) -> Result<Vec<Option<PreviewBlock>>, SummarizeError> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(obj) => match obj.get("blocks") {
            Some(serde_json::Value::Array(items)) => items,
            Some(serde_json::Value::Null) | None => return Ok(Vec::new()),
            Some(other) => {
                return Err(SummarizeError::Parse(format!(
                    "`blocks` is not an array: {other}"
                )));
            }
        },
        serde_json::Value::Null => return Ok(Vec::new()),
        other => return Err(SummarizeError::Parse(format!("unexpected summary: {other}"))),
    };
    Ok(items.iter().map(PreviewBlock::from_value).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;
    use serde_json::json;

    #[test]
    fn test_parse_blocks_shapes() {
        let bare = parse_blocks(&json!([{"blockType": "code", "content": "x"}, null])).unwrap();
        assert_eq!(bare.len(), 2);
        assert_eq!(bare[0].as_ref().map(|b| b.kind), Some(BlockKind::Code));
        assert!(bare[1].is_none());

        let wrapped = parse_blocks(&json!({"blocks": [{"content": "hi"}]})).unwrap();
        assert_eq!(wrapped.len(), 1);

        assert!(parse_blocks(&json!({})).unwrap().is_empty());
        assert!(parse_blocks(&json!("nope")).is_err());
        assert!(parse_blocks(&json!({"blocks": 3})).is_err());
    }
}
