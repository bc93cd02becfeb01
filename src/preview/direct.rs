use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use super::{ContentFetcher, FetchError, FetchedContent};
use crate::text::compact_ws;

/// Downloads pages itself. Used when no backend is configured.
#[derive(Debug, Clone)]
pub struct DirectFetcher {
    client: Client,
}

impl DirectFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for DirectFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedContent, FetchError> {
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }
        let html = resp.text().await?;
        debug!(url, bytes = html.len(), "fetched page");
        let description = meta_description(&html);
        Ok(FetchedContent {
            html: Some(html),
            description,
        })
    }
}

/// `<meta name="description">`, else `og:description`.
pub fn meta_description(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    [
        r#"meta[name="description"]"#,
        r#"meta[property="og:description"]"#,
    ]
    .iter()
    .filter_map(|sel| Selector::parse(sel).ok())
    .find_map(|sel| {
        document
            .select(&sel)
            .filter_map(|el| el.value().attr("content"))
            .map(compact_ws)
            .find(|content| !content.is_empty())
    })
}
