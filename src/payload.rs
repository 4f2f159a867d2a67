//! Incoming webhook payload model.
//!
//! A webhook body is an arbitrary nested JSON document. [`IncomingPayload`]
//! decodes it once per request and exposes typed, optional-returning views
//! over the two inbound shapes Telegram sends: a plain chat message
//! ([`Event`]) or an inline-button press ([`CallbackQuery`]). Lookups never
//! panic; a missing key simply reads as absent.

use serde_json::{Map, Value};

/// Decoded webhook body, read-only for the lifetime of one request.
#[derive(Debug, Clone, Default)]
pub struct IncomingPayload {
    root: Map<String, Value>,
}

impl IncomingPayload {
    /// Decode raw request-body bytes.
    ///
    /// A body that is not valid JSON, or whose top level is not an object,
    /// yields an empty payload; downstream matching then correctly reports
    /// no match instead of erroring on foreign traffic.
    pub fn from_bytes(body: &[u8]) -> Self {
        let root = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self { root }
    }

    /// Whether the provider-issued update identifier is present.
    ///
    /// Every legitimate Telegram webhook call carries `update_id`; its
    /// absence marks a malformed or foreign payload. An explicit JSON
    /// `null` is not an identifier and reads as absent.
    pub fn has_update_id(&self) -> bool {
        self.root.get("update_id").is_some_and(|v| !v.is_null())
    }

    /// View over the `message` sub-document, if present.
    pub fn event(&self) -> Option<Event<'_>> {
        object(&self.root, "message").map(|fields| Event { fields })
    }

    /// View over the `callback_query` sub-document, if present.
    pub fn callback_query(&self) -> Option<CallbackQuery<'_>> {
        object(&self.root, "callback_query").map(|fields| CallbackQuery { fields })
    }
}

/// Typed view over a plain chat message.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    fields: &'a Map<String, Value>,
}

impl Event<'_> {
    /// Message text, if any.
    pub fn text(&self) -> Option<&str> {
        self.fields.get("text").and_then(Value::as_str)
    }

    /// Chat identifier as an opaque string (`chat.id`).
    pub fn chat_id(&self) -> Option<String> {
        object(self.fields, "chat").and_then(|chat| id_string(chat, "id"))
    }

    /// Sender identifier as an opaque string (`from.id`).
    pub fn sender_id(&self) -> Option<String> {
        object(self.fields, "from").and_then(|from| id_string(from, "id"))
    }

    /// Whether the message names a sender at all.
    pub fn has_sender(&self) -> bool {
        self.fields.get("from").is_some_and(|v| !v.is_null())
    }

    /// Whether the provider attached a non-empty entity-annotation list
    /// (links, mentions, bot commands).
    pub fn has_entities(&self) -> bool {
        self.fields
            .get("entities")
            .and_then(Value::as_array)
            .is_some_and(|list| !list.is_empty())
    }
}

/// Typed view over an inline-button press.
#[derive(Debug, Clone, Copy)]
pub struct CallbackQuery<'a> {
    fields: &'a Map<String, Value>,
}

impl CallbackQuery<'_> {
    /// Machine-readable payload attached to the pressed button.
    pub fn data(&self) -> Option<&str> {
        self.fields.get("data").and_then(Value::as_str)
    }

    /// Chat identifier of the conversation the button lives in
    /// (`message.chat.id`).
    pub fn chat_id(&self) -> Option<String> {
        object(self.fields, "message")
            .and_then(|msg| object(msg, "chat"))
            .and_then(|chat| id_string(chat, "id"))
    }

    /// Identifier of the user who pressed the button (`from.id`).
    pub fn sender_id(&self) -> Option<String> {
        object(self.fields, "from").and_then(|from| id_string(from, "id"))
    }
}

/// Nested object lookup, `None` for missing keys or non-object values.
fn object<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    map.get(key).and_then(Value::as_object)
}

/// Read a scalar identifier as an opaque string. Telegram sends ids as JSON
/// numbers; some providers stringify them, so both spellings are accepted.
fn id_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
