//! Note and knowledgebase citations attached to an answer.

use serde_json::Value;

use super::value::{is_truthy, number_field, string_items, text_field};
use crate::text;

/// A personal note matched against the query.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteCitation {
    pub id: Option<String>,
    pub title: Option<String>,
    /// Markup string.
    pub body: String,
    /// Relevance in `[0, 1]`.
    pub similarity: f64,
}

/// A knowledgebase (corpus) entry matched against the query.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusCitation {
    pub id: Option<String>,
    pub title: Option<String>,
    pub body: String,
    pub similarity: f64,
    pub knowledgebase_name: Option<String>,
    pub keywords: Vec<String>,
}

/// Keyword chips shown per knowledgebase card.
pub const MAX_KEYWORD_CHIPS: usize = 3;

fn similarity(value: &Value) -> f64 {
    number_field(value, "similarity")
        .or_else(|| number_field(value, "score"))
        .unwrap_or(0.0)
        .clamp(0.0, 1.0)
}

fn body(value: &Value) -> String {
    text_field(value, &["body", "content", "text"]).unwrap_or_default()
}

impl NoteCitation {
    pub fn from_value(value: &Value) -> Option<Self> {
        if !is_truthy(value) || !value.is_object() {
            return None;
        }
        Some(Self {
            id: text_field(value, &["id", "_id", "noteId"]),
            title: text_field(value, &["title"]),
            body: body(value),
            similarity: similarity(value),
        })
    }

    pub fn display_title(&self) -> &str {
        display_title(self.title.as_deref())
    }

    pub fn relevance(&self) -> String {
        text::relevance_label(self.similarity)
    }

    pub fn excerpt(&self) -> String {
        text::citation_excerpt(&self.body)
    }
}

impl CorpusCitation {
    pub fn from_value(value: &Value) -> Option<Self> {
        if !is_truthy(value) || !value.is_object() {
            return None;
        }
        Some(Self {
            id: text_field(value, &["id", "_id", "corpusId"]),
            title: text_field(value, &["title"]),
            body: body(value),
            similarity: similarity(value),
            knowledgebase_name: text_field(value, &["knowledgebaseName", "knowledgebase_name"]),
            keywords: string_items(value, "keywords"),
        })
    }

    pub fn display_title(&self) -> &str {
        display_title(self.title.as_deref())
    }

    pub fn relevance(&self) -> String {
        text::relevance_label(self.similarity)
    }

    pub fn excerpt(&self) -> String {
        text::citation_excerpt(&self.body)
    }

    /// At most [`MAX_KEYWORD_CHIPS`] keywords, in order.
    pub fn keyword_chips(&self) -> &[String] {
        &self.keywords[..self.keywords.len().min(MAX_KEYWORD_CHIPS)]
    }
}

fn display_title(title: Option<&str>) -> &str {
    title.filter(|t| !t.trim().is_empty()).unwrap_or("Untitled")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_note_card_fields() {
        let note = NoteCitation::from_value(&json!({
            "id": 42, "title": "", "body": "<p>hello</p>", "similarity": 0.8734
        }))
        .unwrap();
        assert_eq!(note.id.as_deref(), Some("42"));
        assert_eq!(note.display_title(), "Untitled");
        assert_eq!(note.relevance(), "87%");
        assert_eq!(note.excerpt(), "hello");
    }

    #[test]
    fn test_corpus_keywords_capped() {
        let entry = CorpusCitation::from_value(&json!({
            "id": "kb-1",
            "title": "Runbook",
            "body": "",
            "similarity": 0.5,
            "knowledgebaseName": "Ops",
            "keywords": ["a", null, "b", "c", "d"]
        }))
        .unwrap();
        assert_eq!(entry.keyword_chips(), ["a", "b", "c"]);
        assert_eq!(entry.excerpt(), "No content");
        assert_eq!(entry.knowledgebase_name.as_deref(), Some("Ops"));
    }

    #[test]
    fn test_similarity_is_clamped() {
        let note = NoteCitation::from_value(&json!({"id": "n", "similarity": 3.2})).unwrap();
        assert_eq!(note.relevance(), "100%");
        assert!(NoteCitation::from_value(&json!("n")).is_none());
    }
}
