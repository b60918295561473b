//! Conversation messages.
//!
//! Roles: System, User, Assistant. Content is plain text, a list of strings
//! and parts (e.g. `["...", {"type":"text","text":"..."}]`), or any other JSON
//! value; it is coerced to text with [`MessageContent::as_text`] before
//! anything reads it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One object part of list-shaped content. Parts without `text` (images, etc.)
/// are skipped when coercing to text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub part_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            part_type: Some("text".into()),
            text: Some(text.into()),
        }
    }
}

/// One item of list-shaped content: a bare string, a part object, or anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentItem {
    Text(String),
    Part(ContentPart),
    Other(Value),
}

impl ContentItem {
    fn as_text(&self) -> String {
        match self {
            ContentItem::Text(s) => s.clone(),
            ContentItem::Part(p) => p.text.clone().unwrap_or_default(),
            ContentItem::Other(v) => value_text(v),
        }
    }
}

impl From<ContentPart> for ContentItem {
    fn from(part: ContentPart) -> Self {
        ContentItem::Part(part)
    }
}

/// Message content: a string, a list of items, or any other JSON value.
///
/// Deserializes from `"hello"`, `["hello", {"type":"text","text":"!"}]`, or
/// e.g. `42`; every shape coerces to text and none fails to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentItem>),
    Other(Value),
}

impl MessageContent {
    /// Text variant as-is; list items joined with no separator; other values stringified.
    pub fn as_text(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Parts(items) => items.iter().map(ContentItem::as_text).collect(),
            MessageContent::Other(v) => value_text(v),
        }
    }
}

/// Strings unquoted, null empty, everything else as compact JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Text(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Text(s.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts.into_iter().map(ContentItem::Part).collect())
    }
}

impl From<Vec<ContentItem>> for MessageContent {
    fn from(items: Vec<ContentItem>) -> Self {
        MessageContent::Parts(items)
    }
}

/// A single message in the conversation.
///
/// `id` is optional for inbound messages; assistant replies built with
/// [`Message::assistant`] always carry a fresh UUID v4.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self {
            id: None,
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self {
            id: None,
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message with a new id.
    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self {
            id: Some(uuid::Uuid::new_v4().to_string()),
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Content coerced to text.
    pub fn text(&self) -> String {
        self.content.as_text()
    }
}

/// Text of the most recent user-authored message, if any.
pub fn last_user_text(messages: &[Message]) -> Option<String> {
    messages.iter().rev().find(|m| m.is_user()).map(Message::text)
}
