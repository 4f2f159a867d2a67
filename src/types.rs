//! Platform-level message model shared by every driver.
//!
//! These are the provider-agnostic values the conversation engine works
//! with: drivers normalize webhooks into [`Message`]s and [`Answer`]s, and
//! translate [`Reply`]s back into provider send-API requests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// A normalized inbound chat message.
///
/// Conversation and sender ids are provider-native identifiers carried as
/// opaque strings; the engine never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message text (or callback payload for button presses).
    pub text: String,
    /// Provider-native conversation/chat identifier.
    pub conversation_id: String,
    /// Provider-native sender identifier.
    pub sender_id: String,
}

impl Message {
    /// Build a message from its three components.
    pub fn new(
        text: impl Into<String>,
        conversation_id: impl Into<String>,
        sender_id: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            conversation_id: conversation_id.into(),
            sender_id: sender_id.into(),
        }
    }
}

/// The value the active conversation step receives for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Typed text, or the machine-readable payload of a pressed button.
    pub value: String,
    /// True when the answer came from an interactive control rather than
    /// free text.
    pub is_interactive_reply: bool,
}

impl Answer {
    /// Answer carrying free text typed by the user.
    pub fn from_text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_interactive_reply: false,
        }
    }

    /// Answer carrying the callback payload of a pressed button.
    pub fn from_callback(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_interactive_reply: true,
        }
    }
}

/// One selectable control attached to a [`Question`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    /// Label shown to the user.
    pub text: String,
    /// Machine-readable payload returned when pressed.
    pub value: String,
}

impl Button {
    /// Build a button from label and payload.
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

/// An outbound prompt with button choices.
///
/// Buttons keep caller-given order and render as a single row in the
/// provider encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Prompt text.
    pub text: String,
    /// Choices, in insertion order.
    pub buttons: Vec<Button>,
}

impl Question {
    /// Question with the given prompt and no buttons yet.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    /// Append one button, preserving insertion order.
    #[must_use]
    pub fn add_button(mut self, button: Button) -> Self {
        self.buttons.push(button);
        self
    }
}

/// An outgoing reply handed to a driver for translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain text message.
    Text(String),
    /// Structured question with button choices.
    Question(Question),
}

impl Reply {
    /// Plain-text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

impl From<Question> for Reply {
    fn from(question: Question) -> Self {
        Self::Question(question)
    }
}

/// A fully prepared provider send-API request, ready for the HTTP
/// transport. Built fresh per reply, never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// Provider send endpoint, token already substituted.
    pub endpoint: Url,
    /// Form-encoded body parameters.
    pub form: BTreeMap<String, String>,
}
