//! Answer-section taxonomy.
//!
//! A section arrives as loosely shaped JSON keyed by a `type` discriminant.
//! Classification is total: every JSON value maps to exactly one variant,
//! with [`AnswerSection::Generic`] taking anything unrecognized.

use serde::Deserialize;
use serde_json::Value;

use super::citation::{CorpusCitation, NoteCitation};
use super::source::Source;
use super::value::{payload, scalar_text, string_items, text_field, truthy_items, truthy_items_any};

/// One self-contained unit of an AI turn.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum AnswerSection {
    /// `type: "answer"`: generic fields laid out around a leading image.
    Answer(GenericSection),
    /// `type: "promoted"`
    Promoted(PromotedSection),
    /// `type: "wikipedia"`
    Encyclopedia(EncyclopediaSection),
    /// `type: "duckduckgo"`
    InstantAnswer(InstantAnswerSection),
    /// `type: "others"`
    OtherResults(OtherResultsSection),
    /// Missing or unrecognized `type`.
    Generic(GenericSection),
}

impl AnswerSection {
    pub fn classify(value: &Value) -> Self {
        match value.get("type").and_then(Value::as_str) {
            Some("answer") => AnswerSection::Answer(GenericSection::from_value(value)),
            Some("promoted") => AnswerSection::Promoted(PromotedSection::from_value(value)),
            Some("wikipedia") => AnswerSection::Encyclopedia(EncyclopediaSection::from_value(value)),
            Some("duckduckgo") => AnswerSection::InstantAnswer(InstantAnswerSection::from_value(value)),
            Some("others") => AnswerSection::OtherResults(OtherResultsSection::from_value(value)),
            _ => AnswerSection::Generic(GenericSection::from_value(value)),
        }
    }

    /// Short name for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AnswerSection::Answer(_) => "answer",
            AnswerSection::Promoted(_) => "promoted",
            AnswerSection::Encyclopedia(_) => "wikipedia",
            AnswerSection::InstantAnswer(_) => "duckduckgo",
            AnswerSection::OtherResults(_) => "others",
            AnswerSection::Generic(_) => "generic",
        }
    }
}

impl From<Value> for AnswerSection {
    fn from(value: Value) -> Self {
        Self::classify(&value)
    }
}

// =============================================================================
// Response body
// =============================================================================

/// A labeled code-or-text entry of an array response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub label: Option<String>,
    pub content: String,
    pub language: Option<String>,
    pub is_code: bool,
}

impl Snippet {
    fn from_value(value: &Value) -> Option<Self> {
        if let Some(text) = scalar_text(value) {
            return Some(Self {
                label: None,
                content: text,
                language: None,
                is_code: false,
            });
        }
        if !value.is_object() {
            return None;
        }
        let label = text_field(value, &["label", "title", "name"]);
        let language = text_field(value, &["language", "lang"]);
        if let Some(code) = text_field(value, &["code"]) {
            return Some(Self {
                label,
                content: code,
                language,
                is_code: true,
            });
        }
        let content = text_field(value, &["content", "text", "snippet"]).unwrap_or_default();
        Some(Self {
            label,
            is_code: language.is_some(),
            content,
            language,
        })
    }
}

/// Normalized `response` field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResponseBody {
    /// Absent, `null` or `""`: renders as nothing.
    #[default]
    Empty,
    /// Markdown prose.
    Prose(String),
    /// Independent labeled snippets.
    Snippets(Vec<Snippet>),
    /// Any other value, stringified.
    Preformatted(String),
}

impl ResponseBody {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => ResponseBody::Empty,
            Some(Value::String(s)) if s.is_empty() => ResponseBody::Empty,
            Some(Value::String(s)) => ResponseBody::Prose(s.clone()),
            Some(Value::Array(items)) => ResponseBody::Snippets(
                items
                    .iter()
                    .filter(|v| super::value::is_truthy(v))
                    .filter_map(Snippet::from_value)
                    .collect(),
            ),
            Some(obj @ Value::Object(_)) => {
                ResponseBody::Preformatted(serde_json::to_string_pretty(obj).unwrap_or_default())
            }
            Some(other) => ResponseBody::Preformatted(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ResponseBody::Empty => true,
            ResponseBody::Prose(s) | ResponseBody::Preformatted(s) => s.trim().is_empty(),
            ResponseBody::Snippets(items) => items.is_empty(),
        }
    }
}

// =============================================================================
// Variants
// =============================================================================

/// Fields shared by the generic and `answer` layouts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenericSection {
    pub topic: Option<String>,
    pub response: ResponseBody,
    pub sources: Vec<Source>,
    pub images: Vec<String>,
    pub date: Option<String>,
    pub captcha_url: Option<String>,
    pub notes: Vec<NoteCitation>,
    pub knowledgebase: Vec<CorpusCitation>,
}

impl GenericSection {
    pub fn from_value(value: &Value) -> Self {
        if let Value::String(prose) = value {
            return Self {
                response: ResponseBody::from_value(Some(&Value::String(prose.clone()))),
                ..Self::default()
            };
        }
        let mut images = string_items(value, "images");
        if images.is_empty() {
            images.extend(text_field(value, &["image"]));
        }
        Self {
            topic: text_field(value, &["topic", "title"]),
            response: ResponseBody::from_value(value.get("response")),
            sources: truthy_items(value, "sources")
                .into_iter()
                .filter_map(Source::from_value)
                .collect(),
            images,
            date: text_field(value, &["date"]),
            captcha_url: text_field(value, &["captchaUrl", "captcha_url"])
                .filter(|url| !url.trim().is_empty()),
            notes: truthy_items(value, "notes")
                .into_iter()
                .filter_map(NoteCitation::from_value)
                .collect(),
            knowledgebase: truthy_items_any(value, &["knowledgebase", "corpus"])
                .into_iter()
                .filter_map(CorpusCitation::from_value)
                .collect(),
        }
    }

    pub fn lead_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromotedSection {
    pub heading: Option<String>,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub links: Vec<Source>,
}

impl PromotedSection {
    pub fn from_value(value: &Value) -> Self {
        let data = payload(value);
        Self {
            heading: text_field(data, &["heading", "title"]),
            description: text_field(data, &["description", "snippet"]),
            images: string_items(data, "images"),
            links: truthy_items(data, "links")
                .into_iter()
                .filter_map(Source::from_value)
                .collect(),
        }
    }

    /// Primary heading and optional badge.
    pub fn heading_parts(&self) -> Option<(String, Option<String>)> {
        self.heading.as_deref().map(crate::text::split_heading)
    }

    pub fn lead_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Images after the lead one.
    pub fn strip_images(&self) -> &[String] {
        self.images.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncyclopediaSection {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub references: Vec<Source>,
}

impl EncyclopediaSection {
    pub fn from_value(value: &Value) -> Self {
        let data = payload(value);
        Self {
            title: text_field(data, &["title", "topic"]),
            summary: text_field(data, &["summary", "extract"]),
            references: truthy_items(data, "references")
                .into_iter()
                .filter_map(Source::from_value)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.references.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstantAnswerSection {
    pub answer: Option<String>,
    pub link: Option<String>,
}

impl InstantAnswerSection {
    pub fn from_value(value: &Value) -> Self {
        let data = payload(value);
        Self {
            answer: text_field(data, &["answer", "abstract"]),
            link: text_field(data, &["link", "url"]),
        }
    }

    pub fn is_present(&self) -> bool {
        self.answer.is_some() || self.link.is_some()
    }

    /// The trimmed link, if non-empty.
    pub fn card_link(&self) -> Option<&str> {
        self.link.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }
}

/// Structured detail behind one miscellaneous web hit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OtherDetail {
    pub title: Option<String>,
    pub texts: Vec<String>,
    pub images: Vec<String>,
    pub links: Vec<Source>,
}

impl OtherDetail {
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.images.is_empty() && self.links.is_empty()
    }
}

/// A miscellaneous web hit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OtherResultItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub images: Vec<String>,
    pub texts: Vec<String>,
    pub links: Vec<Source>,
}

impl OtherResultItem {
    pub fn from_value(value: &Value) -> Option<Self> {
        if let Value::String(link) = value {
            return Some(Self {
                link: Some(link.clone()),
                ..Self::default()
            });
        }
        if !value.is_object() {
            return None;
        }
        let (images, texts, links) = match value.get("data") {
            Some(data @ Value::Object(_)) => (
                string_items(data, "images"),
                string_items(data, "texts"),
                truthy_items(data, "links")
                    .into_iter()
                    .filter_map(Source::from_value)
                    .collect(),
            ),
            _ => Default::default(),
        };
        Some(Self {
            title: text_field(value, &["title", "name"]),
            link: text_field(value, &["link", "url"]),
            images,
            texts,
            links,
        })
    }

    /// The trimmed link, if non-empty.
    pub fn actionable_link(&self) -> Option<&str> {
        self.link.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }

    pub fn detail(&self) -> OtherDetail {
        OtherDetail {
            title: Some(self.display_title()),
            texts: self.texts.clone(),
            images: self.images.clone(),
            links: self.links.clone(),
        }
    }

    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.texts.first().cloned())
            .or_else(|| self.actionable_link().map(str::to_string))
            .unwrap_or_else(|| "Untitled result".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OtherResultsSection {
    /// The section's prose `response`, when it is a string.
    pub summary: Option<String>,
    pub items: Vec<OtherResultItem>,
}

impl OtherResultsSection {
    pub fn from_value(value: &Value) -> Self {
        let summary = match value.get("response") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        };
        Self {
            summary,
            items: truthy_items_any(value, &["data", "results", "items"])
                .into_iter()
                .filter_map(OtherResultItem::from_value)
                .collect(),
        }
    }
}
