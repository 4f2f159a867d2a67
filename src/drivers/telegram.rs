//! Telegram driver.
//!
//! Inbound, a webhook update is either a plain chat message or an inline
//! keyboard callback; both normalize into one [`Message`]. Outbound,
//! replies become form-encoded `sendMessage` calls, with question buttons
//! rendered as a single inline-keyboard row inside the `reply_markup`
//! field. `reply_markup` is a JSON string embedded in the form body — a
//! Telegram quirk the wire format depends on, preserved as-is.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::ConfigProvider;
use crate::drivers::{Driver, DriverError};
use crate::payload::IncomingPayload;
use crate::transport::{HttpTransport, TransportResponse};
use crate::types::{Answer, Message, OutboundRequest, Question, Reply};

/// Base URL for the Telegram Bot API.
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Configuration key holding the bot token.
pub const TOKEN_CONFIG_KEY: &str = "telegram_token";

// ---------------------------------------------------------------------------
// Outbound wire types
// ---------------------------------------------------------------------------

/// Inline keyboard markup, serialized into the `reply_markup` form field.
#[derive(Debug, Serialize)]
struct InlineKeyboardMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// A single inline keyboard button.
#[derive(Debug, Serialize)]
struct InlineKeyboardButton {
    text: String,
    callback_data: String,
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Telegram implementation of the [`Driver`] contract.
///
/// One instance is built per webhook request; the payload is decoded once
/// in [`TelegramDriver::new`] and every operation reads from that decoded
/// view. Config and transport are shared host collaborators.
pub struct TelegramDriver {
    payload: IncomingPayload,
    config: Arc<dyn ConfigProvider>,
    transport: Arc<dyn HttpTransport>,
}

impl TelegramDriver {
    /// Build a driver over the raw webhook body.
    ///
    /// A body that is not a JSON object decodes to an empty payload, so
    /// [`matches_request`](Driver::matches_request) reports no match
    /// instead of failing.
    pub fn new(
        body: &[u8],
        config: Arc<dyn ConfigProvider>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            payload: IncomingPayload::from_bytes(body),
            config,
            transport,
        }
    }

    /// Translate an outgoing reply into the `sendMessage` request.
    ///
    /// The form starts as `{chat_id: conversation_id}`, merges in
    /// `extra_params` (which may override `chat_id`), and only then writes
    /// `text` and, for questions, `reply_markup` — so callers cannot
    /// clobber the reply content itself.
    ///
    /// # Errors
    ///
    /// [`DriverError::MissingConfig`] when no bot token is configured,
    /// [`DriverError::InvalidEndpoint`] when the token does not form a
    /// valid URL.
    pub fn translate(
        &self,
        reply: &Reply,
        conversation_id: &str,
        extra_params: &BTreeMap<String, String>,
    ) -> Result<OutboundRequest, DriverError> {
        let mut form = BTreeMap::new();
        form.insert("chat_id".to_string(), conversation_id.to_string());
        for (key, value) in extra_params {
            form.insert(key.clone(), value.clone());
        }

        match reply {
            Reply::Question(question) => {
                form.insert("text".to_string(), question.text.clone());
                form.insert("reply_markup".to_string(), encode_markup(question)?);
            }
            Reply::Text(text) => {
                form.insert("text".to_string(), text.clone());
            }
        }

        let token = self
            .config
            .get(TOKEN_CONFIG_KEY)
            .ok_or(DriverError::MissingConfig(TOKEN_CONFIG_KEY))?;
        let endpoint = Url::parse(&format!("{TELEGRAM_API_BASE}/bot{token}/sendMessage"))?;

        Ok(OutboundRequest { endpoint, form })
    }
}

/// Encode a question's buttons as one inline-keyboard row, JSON-stringified
/// for embedding in the form body. Zero buttons still yields a valid empty
/// row.
fn encode_markup(question: &Question) -> Result<String, DriverError> {
    let row = question
        .buttons
        .iter()
        .map(|button| InlineKeyboardButton {
            text: button.text.clone(),
            callback_data: button.value.clone(),
        })
        .collect();
    let markup = InlineKeyboardMarkup {
        inline_keyboard: vec![row],
    };
    Ok(serde_json::to_string(&markup)?)
}

/// Log and build the hard failure for a missing required field.
fn missing(field: &'static str) -> DriverError {
    warn!(field, "telegram payload matched but is malformed");
    DriverError::MalformedPayload { field }
}

#[async_trait]
impl Driver for TelegramDriver {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn matches_request(&self) -> bool {
        // update_id is Telegram's universal envelope marker; without it the
        // payload is foreign no matter what else it carries.
        let matched = self.payload.has_update_id()
            && (self.payload.event().is_some_and(|event| event.has_sender())
                || self.payload.callback_query().is_some());
        debug!(driver = "telegram", matched, "probed inbound payload");
        matched
    }

    fn messages(&self) -> Result<Vec<Message>, DriverError> {
        let message = if let Some(callback) = self.payload.callback_query() {
            let text = callback.data().ok_or_else(|| missing("callback_query.data"))?;
            let conversation_id = callback
                .chat_id()
                .ok_or_else(|| missing("callback_query.message.chat.id"))?;
            let sender_id = callback
                .sender_id()
                .ok_or_else(|| missing("callback_query.from.id"))?;
            Message::new(text, conversation_id, sender_id)
        } else {
            let event = self.payload.event().ok_or_else(|| missing("message"))?;
            let text = event.text().ok_or_else(|| missing("message.text"))?;
            let conversation_id = event.chat_id().ok_or_else(|| missing("message.chat.id"))?;
            let sender_id = event.sender_id().ok_or_else(|| missing("message.from.id"))?;
            Message::new(text, conversation_id, sender_id)
        };
        debug!(
            conversation_id = %message.conversation_id,
            sender_id = %message.sender_id,
            "normalized telegram update"
        );
        Ok(vec![message])
    }

    fn conversation_answer(&self, message: &Message) -> Result<Answer, DriverError> {
        // The callback's data lands in both the Message text and the Answer
        // value; the engine may need the raw token in either channel.
        if let Some(callback) = self.payload.callback_query() {
            let data = callback.data().ok_or_else(|| missing("callback_query.data"))?;
            return Ok(Answer::from_callback(data));
        }
        Ok(Answer::from_text(message.text.clone()))
    }

    fn is_bot(&self) -> bool {
        self.payload
            .event()
            .is_some_and(|event| event.has_entities())
    }

    async fn reply(
        &self,
        reply: &Reply,
        matching_message: &Message,
        extra_params: &BTreeMap<String, String>,
    ) -> Result<TransportResponse, DriverError> {
        let request = self.translate(reply, &matching_message.conversation_id, extra_params)?;
        debug!(driver = self.name(), endpoint = %request.endpoint, "posting reply");
        Ok(self.transport.post(&request.endpoint, &request.form).await?)
    }
}
