//! Chat turns as they arrive from the transcript.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::section::AnswerSection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Human,
    Ai,
}

impl Role {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" | "user" => Some(Role::Human),
            "ai" | "assistant" => Some(Role::Ai),
            _ => None,
        }
    }
}

/// One turn. Human content is plain text; AI content is an ordered list of
/// sections rendered top to bottom.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum Message {
    Human(String),
    Ai(Vec<AnswerSection>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    #[error("message is not an object")]
    NotAnObject,
    #[error("message has no role")]
    MissingRole,
    #[error("unknown message role: {0}")]
    UnknownRole(String),
}

impl Message {
    pub fn role(&self) -> Role {
        match self {
            Message::Human(_) => Role::Human,
            Message::Ai(_) => Role::Ai,
        }
    }
}

impl TryFrom<Value> for Message {
    type Error = MessageError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut obj) = value else {
            return Err(MessageError::NotAnObject);
        };
        let raw_role = obj
            .get("role")
            .and_then(Value::as_str)
            .ok_or(MessageError::MissingRole)?
            .to_string();
        let role = Role::parse(&raw_role).ok_or(MessageError::UnknownRole(raw_role))?;
        let content = obj.remove("content").unwrap_or(Value::Null);

        Ok(match role {
            Role::Human => Message::Human(match content {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            }),
            Role::Ai => Message::Ai(match content {
                Value::Array(items) => items.into_iter().map(AnswerSection::from).collect(),
                Value::Null => Vec::new(),
                // A lone string or object is a single section.
                other => vec![AnswerSection::from(other)],
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_human_message() {
        let msg = Message::try_from(json!({"role": "user", "content": "what is rust?"})).unwrap();
        assert_eq!(msg, Message::Human("what is rust?".to_string()));
    }

    #[test]
    fn test_ai_message_keeps_section_order() {
        let msg = Message::try_from(json!({
            "role": "ai",
            "content": [{"type": "wikipedia"}, {"type": "promoted"}, {"response": "x"}]
        }))
        .unwrap();
        let Message::Ai(sections) = msg else { panic!("expected ai") };
        let kinds: Vec<_> = sections.iter().map(AnswerSection::kind_name).collect();
        assert_eq!(kinds, vec!["wikipedia", "promoted", "generic"]);
    }

    #[test]
    fn test_ai_string_content_is_one_section() {
        let msg = Message::try_from(json!({"role": "assistant", "content": "hello"})).unwrap();
        let Message::Ai(sections) = msg else { panic!("expected ai") };
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn test_bad_roles() {
        assert_eq!(
            Message::try_from(json!({"role": "system", "content": ""})),
            Err(MessageError::UnknownRole("system".to_string()))
        );
        assert_eq!(Message::try_from(json!({"content": ""})), Err(MessageError::MissingRole));
        assert_eq!(Message::try_from(json!("x")), Err(MessageError::NotAnObject));
    }
}
