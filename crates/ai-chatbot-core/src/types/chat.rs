//! Conversation and message records as persisted in the store

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Text typed by the user
    Prompt,
    /// Text generated by the language model
    Response,
    /// Failure shown in the conversation instead of a response
    Error,
}

/// One message of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message origin
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Message body
    pub text: String,
    /// Local wall-clock time, `HH:MM:SS`
    #[serde(rename = "timeStamp", default)]
    pub time_stamp: String,
}

impl Message {
    /// Create a message stamped with the current local time
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            time_stamp: Local::now().format("%H:%M:%S").to_string(),
        }
    }

    /// User prompt
    pub fn prompt(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Prompt, text)
    }

    /// Model response
    pub fn response(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Response, text)
    }

    /// In-conversation error
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, text)
    }
}

/// Entry of a user's conversation list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    /// Conversation id (uuid v4 for new chats; arbitrary for migrated ones).
    /// Numeric ids read as their string form; a missing id reads as empty.
    #[serde(default, deserialize_with = "id_from_string_or_number")]
    pub id: String,
    /// Human-readable label, `Chat <dd/mm/yyyy> <HH:MM:SS>`
    #[serde(rename = "displayId", default)]
    pub display_id: String,
    /// Messages present when the chat was created
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl ChatSummary {
    /// New conversation with a fresh id, optionally seeded with a prompt
    pub fn new(initial_message: Option<&str>) -> Self {
        let now = Local::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            display_id: display_label(now),
            messages: initial_message
                .filter(|text| !text.is_empty())
                .map(|text| vec![Message::prompt(text)])
                .unwrap_or_default(),
        }
    }
}

/// Id of a raw list entry; numbers are accepted as their string form
pub(crate) fn entry_id(entry: &Value) -> Option<String> {
    match entry.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn id_from_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(id)) => id,
        Some(RawId::Number(id)) => id.to_string(),
        None => String::new(),
    })
}

fn display_label(at: DateTime<Local>) -> String {
    format!("Chat {}", at.format("%d/%m/%Y %H:%M:%S"))
}
