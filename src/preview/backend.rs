//! Client for the answer backend's content, summarize and knowledgebase
//! endpoints.

use std::time::Duration;

use anyhow::{bail, Context as _};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::{parse_blocks, ContentFetcher, FetchError, FetchedContent, SummarizeError, Summarizer};
use crate::library::{CorpusRecord, CorpusStore, LookupError};
use crate::model::PreviewBlock;

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base_url.trim())
            .with_context(|| format!("Invalid backend URL: {base_url}"))?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!("Backend URL must be http or https: {base_url}");
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `base` with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl ContentFetcher for HttpBackend {
    async fn fetch(&self, url: &str) -> Result<FetchedContent, FetchError> {
        let endpoint = self.endpoint(&["fetch-content"]);
        debug!(%endpoint, url, "fetching content");
        let resp = self
            .client
            .post(endpoint)
            .json(&json!({ "url": url }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }
        resp.json::<FetchedContent>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Summarizer for HttpBackend {
    async fn summarize(&self, html: &str) -> Result<Vec<Option<PreviewBlock>>, SummarizeError> {
        let endpoint = self.endpoint(&["summarize"]);
        debug!(%endpoint, bytes = html.len(), "summarizing content");
        let resp = self
            .client
            .post(endpoint)
            .json(&json!({ "html": html }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(SummarizeError::Status(resp.status().as_u16()));
        }
        let value = resp
            .json::<Value>()
            .await
            .map_err(|e| SummarizeError::Parse(e.to_string()))?;
        parse_blocks(&value)
    }
}

#[async_trait]
impl CorpusStore for HttpBackend {
    async fn corpus_entry(&self, id: &str) -> Result<Option<CorpusRecord>, LookupError> {
        let endpoint = self.endpoint(&["knowledgebase", id]);
        debug!(%endpoint, "looking up knowledgebase entry");
        let resp = self.client.get(endpoint).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => resp
                .json::<CorpusRecord>()
                .await
                .map(Some)
                .map_err(|e| LookupError::Decode(e.to_string())),
            status => Err(LookupError::Status(status.as_u16())),
        }
    }
}
