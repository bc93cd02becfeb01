//! Cited web sources and the preview blocks summarized from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::value::{is_truthy, text_field};

/// A cited web page. Only a source with a non-empty `url` can be opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

impl Source {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Accepts a bare URL string or an object. Returns `None` for holes and
    /// for objects carrying nothing displayable.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !is_truthy(value) {
            return None;
        }
        if let Value::String(url) = value {
            return Some(Self::from_url(url.clone()));
        }
        let source = Self {
            title: text_field(value, &["title", "name"]),
            url: text_field(value, &["url", "link", "href"]),
            snippet: text_field(value, &["snippet", "description", "content"]),
        };
        (source.title.is_some() || source.url.is_some()).then_some(source)
    }

    /// The trimmed URL, if it is non-empty.
    pub fn actionable_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn is_actionable(&self) -> bool {
        self.actionable_url().is_some()
    }

    /// Title for a card: explicit title, else the URL's host, else "Untitled".
    pub fn display_title(&self) -> String {
        if let Some(title) = self.title.as_deref().filter(|t| !t.trim().is_empty()) {
            return title.trim().to_string();
        }
        self.actionable_url()
            .and_then(|url| url::Url::parse(url).ok())
            .and_then(|url| url.host_str().map(str::to_string))
            .or_else(|| self.actionable_url().map(str::to_string))
            .unwrap_or_else(|| "Untitled".to_string())
    }
}

/// Presentation of one preview block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockKind {
    Code,
    Image,
    Link,
    #[default]
    Text,
}

impl BlockKind {
    /// Case-insensitive; unknown or absent kinds are text.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("code") => BlockKind::Code,
            Some("image") => BlockKind::Image,
            Some("link") => BlockKind::Link,
            _ => BlockKind::Text,
        }
    }
}

/// One typed fragment of a summarized page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewBlock {
    pub kind: BlockKind,
    pub description: Option<String>,
    /// Source code, image path, absolute link or markdown text, by `kind`.
    pub content: String,
    pub language: Option<String>,
}

impl PreviewBlock {
    pub fn new(kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            description: None,
            content: content.into(),
            language: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// `None` for holes. A bare string becomes a text block.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !is_truthy(value) {
            return None;
        }
        if let Value::String(text) = value {
            return Some(Self::new(BlockKind::Text, text.clone()));
        }
        let kind_raw = text_field(value, &["blockType", "block_type", "type"]);
        let content = match value.get("content") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        Some(Self {
            kind: BlockKind::parse(kind_raw.as_deref()),
            description: text_field(value, &["description", "title"]),
            content,
            language: text_field(value, &["language", "lang"]),
        })
    }
}
