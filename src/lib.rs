//! Botbridge — messaging-provider drivers for conversational-bot platforms.
//!
//! A driver adapts one provider's webhook wire format into the platform's
//! provider-agnostic message model, and adapts outgoing replies back into
//! that provider's send-API calls. The host platform feeds each inbound
//! request to every registered driver's [`Driver::matches_request`]; the
//! matching driver normalizes the payload into [`types::Message`]s and
//! [`types::Answer`]s for the conversation engine, and later translates
//! the engine's [`types::Reply`] into the outbound HTTP call.
//!
//! The crate is stateless per request: a driver instance lives for one
//! webhook call, and its only effect is the outbound post delegated to
//! the [`transport::HttpTransport`] collaborator.
//!
//! [`Driver::matches_request`]: drivers::Driver::matches_request

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod drivers;
pub mod logging;
pub mod payload;
pub mod transport;
pub mod types;

pub use drivers::telegram::TelegramDriver;
pub use drivers::{Driver, DriverError};
pub use types::{Answer, Button, Message, OutboundRequest, Question, Reply};
