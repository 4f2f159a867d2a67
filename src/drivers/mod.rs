//! Drivers — provider-specific adapters behind a shared contract.
//!
//! Each driver normalizes one provider's webhook wire format into the
//! platform message model and translates outgoing replies back into that
//! provider's send-API calls. The host dispatcher probes every registered
//! driver with [`Driver::matches_request`] and hands the rest of the turn
//! to the one that claims the payload.

pub mod telegram;

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::transport::{TransportError, TransportResponse};
use crate::types::{Answer, Message, Reply};

/// Driver-level failure.
///
/// A payload that simply belongs to another provider is *not* an error;
/// [`Driver::matches_request`] returns `false` and the dispatcher moves on.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The payload matched this driver but a required nested field is
    /// absent. Never masked: a missing chat or sender id would misroute
    /// the conversation, so the host must surface a diagnostic instead.
    #[error("malformed payload: missing {field}")]
    MalformedPayload {
        /// Dotted path of the first missing field.
        field: &'static str,
    },
    /// A required configuration value (e.g. the provider token) is absent.
    #[error("missing configuration value: {0}")]
    MissingConfig(&'static str),
    /// The configured token produced an unparseable send endpoint.
    #[error("invalid provider endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    /// Encoding the provider's structured markup field failed.
    #[error("failed to encode reply markup: {0}")]
    EncodeMarkup(#[from] serde_json::Error),
    /// The outbound HTTP collaborator could not perform the request.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Contract the host platform calls on every registered driver.
///
/// One driver instance is built per webhook request and is stateless
/// beyond the decoded payload; all operations are pure functions of it,
/// except [`reply`](Driver::reply), whose only effect is the delegated
/// outbound post.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Stable provider name, for logging and host diagnostics.
    fn name(&self) -> &'static str;

    /// Whether the inbound payload belongs to this provider.
    fn matches_request(&self) -> bool;

    /// Normalized messages carried by the payload.
    ///
    /// Modeled as a sequence so the contract stays uniform across drivers
    /// that batch several messages per webhook call; this driver family
    /// yields exactly one.
    ///
    /// # Errors
    ///
    /// [`DriverError::MalformedPayload`] when a required nested field
    /// (text/data, chat id, sender id) is absent.
    fn messages(&self) -> Result<Vec<Message>, DriverError>;

    /// The answer the active conversation step should receive.
    ///
    /// # Errors
    ///
    /// [`DriverError::MalformedPayload`] when an interactive callback is
    /// present but carries no payload.
    fn conversation_answer(&self, message: &Message) -> Result<Answer, DriverError>;

    /// Best-effort classification of automated senders. A heuristic, not
    /// authentication.
    fn is_bot(&self) -> bool;

    /// Translate `reply` into the provider send-API call and post it.
    ///
    /// `extra_params` merge into the form body and may override the
    /// conversation id (caller-controlled, last-writer-wins). The provider
    /// response is returned unchanged; retry policy belongs to the
    /// transport.
    ///
    /// # Errors
    ///
    /// [`DriverError::MissingConfig`] when the provider token is absent,
    /// [`DriverError::Transport`] when the post could not be performed.
    async fn reply(
        &self,
        reply: &Reply,
        matching_message: &Message,
        extra_params: &BTreeMap<String, String>,
    ) -> Result<TransportResponse, DriverError>;
}
