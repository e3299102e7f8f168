//! Chat envelope — a typed view over the otherwise opaque request body.
//!
//! The proxy only cares about two fields of an inbound chat-completion
//! request: `model` (which picks the upstream) and `messages`. Everything
//! else is carried in a passthrough bag and forwarded untouched, so a body
//! survives `from_body` → `into_body` without losing or reshaping fields.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ─────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────

/// One entry of the `messages` array (`{"role": ..., "content": ...}`).
///
/// `content` distinguishes an explicit `null` from an absent field so the
/// message re-serializes exactly as received.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub content: Option<Value>,
    /// Any other per-message fields (`name`, `tool_calls`, …).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ChatMessage {
    /// Create a message with plain text content.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Some(Value::String(content.into())),
            extra: Map::new(),
        }
    }

    fn into_value(self) -> Value {
        let mut obj = self.extra;
        obj.insert("role".to_string(), Value::String(self.role));
        if let Some(content) = self.content {
            obj.insert("content".to_string(), content);
        }
        Value::Object(obj)
    }
}

// ─────────────────────────────────────────────
// Envelope
// ─────────────────────────────────────────────

/// Errors building an envelope from raw JSON.
#[derive(Debug, Error, PartialEq)]
pub enum EnvelopeError {
    #[error("request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Inbound chat request: typed `model`/`messages` plus a passthrough bag.
///
/// A `model` that is not a string, or `messages` that do not parse as
/// role/content pairs, stay in `extra` verbatim. Only a body that is not a
/// JSON object is rejected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatEnvelope {
    pub model: Option<String>,
    pub messages: Option<Vec<ChatMessage>>,
    pub extra: Map<String, Value>,
}

impl ChatEnvelope {
    /// Split a JSON object into the typed fields and the passthrough bag.
    pub fn from_body(mut body: Map<String, Value>) -> Self {
        let mut envelope = ChatEnvelope::default();
        if let Some(model) = body.remove("model") {
            envelope.set_model(model);
        }
        if let Some(messages) = body.remove("messages") {
            envelope.set_messages(messages);
        }
        envelope.extra.append(&mut body);
        envelope
    }

    /// Build an envelope from any JSON value; only objects are accepted.
    pub fn from_value(value: Value) -> Result<Self, EnvelopeError> {
        match value {
            Value::Object(body) => Ok(Self::from_body(body)),
            other => Err(EnvelopeError::NotAnObject(json_kind(&other))),
        }
    }

    /// The routing key: the `model` string, or `""` when absent.
    pub fn model_key(&self) -> &str {
        self.model.as_deref().unwrap_or("")
    }

    /// Shallow-merge fixed fields over the body; override values win.
    pub fn apply_overrides(&mut self, overrides: &Map<String, Value>) {
        for (key, value) in overrides {
            match key.as_str() {
                "model" => self.set_model(value.clone()),
                "messages" => self.set_messages(value.clone()),
                _ => {
                    self.extra.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// Re-assemble the outbound JSON object.
    pub fn into_body(self) -> Map<String, Value> {
        let mut body = self.extra;
        if let Some(model) = self.model {
            body.insert("model".to_string(), Value::String(model));
        }
        if let Some(messages) = self.messages {
            body.insert(
                "messages".to_string(),
                Value::Array(messages.into_iter().map(ChatMessage::into_value).collect()),
            );
        }
        body
    }

    fn set_model(&mut self, value: Value) {
        match value {
            Value::String(model) => {
                self.extra.remove("model");
                self.model = Some(model);
            }
            other => {
                self.model = None;
                self.extra.insert("model".to_string(), other);
            }
        }
    }

    fn set_messages(&mut self, value: Value) {
        match serde_json::from_value::<Vec<ChatMessage>>(value.clone()) {
            Ok(messages) => {
                self.extra.remove("messages");
                self.messages = Some(messages);
            }
            Err(_) => {
                self.messages = None;
                self.extra.insert("messages".to_string(), value);
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
