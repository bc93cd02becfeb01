//! Note and knowledgebase lookups behind the citation open hooks.
//!
//! Notes are looked up synchronously from a local JSON library. Knowledgebase
//! entries are looked up asynchronously, either from the same library or from
//! the remote backend.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context as _;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

/// A personal note record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Note {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: String,
}

/// A knowledgebase (corpus) record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusRecord {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "content")]
    pub body: String,
    #[serde(default, alias = "knowledgebase_name")]
    pub knowledgebase_name: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Ids arrive as strings or numbers.
fn id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid id: {other}"))),
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote returned status {0}")]
    Status(u16),
    #[error("malformed record: {0}")]
    Decode(String),
}

pub trait NoteStore: Send + Sync {
    fn note(&self, id: &str) -> Option<Note>;
}

#[async_trait]
pub trait CorpusStore: Send + Sync {
    /// `Ok(None)` when no entry has this id.
    async fn corpus_entry(&self, id: &str) -> Result<Option<CorpusRecord>, LookupError>;
}

/// On-disk library file: a bare array of notes, or an object with `notes`
/// and `knowledgebase` arrays.
#[derive(Debug, Default, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    notes: Vec<Value>,
    #[serde(default, alias = "corpus")]
    knowledgebase: Vec<Value>,
}

/// Notes and knowledgebase entries loaded from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct JsonLibrary {
    notes: HashMap<String, Note>,
    corpus: HashMap<String, CorpusRecord>,
}

impl JsonLibrary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read notes library {}", path.display()))?;
        let library = Self::from_json(&raw)
            .with_context(|| format!("Invalid notes library JSON at {}", path.display()))?;
        info!(
            path = %path.display(),
            notes = library.notes.len(),
            knowledgebase = library.corpus.len(),
            "loaded notes library"
        );
        Ok(library)
    }

    /// Parse a library. Malformed records are skipped with a warning.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let file = match value {
            Value::Array(notes) => LibraryFile {
                notes,
                ..LibraryFile::default()
            },
            other => serde_json::from_value(other)?,
        };
        Ok(Self {
            notes: collect_records(file.notes, |n: &Note| n.id.clone()),
            corpus: collect_records(file.knowledgebase, |c: &CorpusRecord| c.id.clone()),
        })
    }

    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.insert(note.id.clone(), note);
        self
    }

    pub fn with_corpus_entry(mut self, record: CorpusRecord) -> Self {
        self.corpus.insert(record.id.clone(), record);
        self
    }
}

fn collect_records<T, K>(values: Vec<Value>, key: K) -> HashMap<String, T>
where
    T: for<'de> Deserialize<'de>,
    K: Fn(&T) -> String,
{
    values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value::<T>(value) {
            Ok(record) => Some((key(&record), record)),
            Err(err) => {
                warn!(index = idx, error = %err, "skipping malformed library record");
                None
            }
        })
        .collect()
}

impl NoteStore for JsonLibrary {
    fn note(&self, id: &str) -> Option<Note> {
        self.notes.get(id).cloned()
    }
}

#[async_trait]
impl CorpusStore for JsonLibrary {
    async fn corpus_entry(&self, id: &str) -> Result<Option<CorpusRecord>, LookupError> {
        Ok(self.corpus.get(id).cloned())
    }
}
