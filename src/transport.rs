//! Outbound HTTP seam.
//!
//! Drivers build [`OutboundRequest`](crate::types::OutboundRequest)s and
//! hand them to an [`HttpTransport`]; they never interpret the response
//! beyond returning it to the host. Retry and timeout policy live behind
//! this trait, not in the drivers.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Transport-level failure: the request could not be performed at all.
///
/// A completed HTTP exchange with a non-success status is *not* an error
/// here; it comes back as a [`TransportResponse`] for the host to inspect.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying HTTP client failed (connect, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Provider response, passed through to the host unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl TransportResponse {
    /// Whether the provider accepted the request (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP collaborator the drivers delegate sending to.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST a form-encoded body to `url` and return the provider response.
    async fn post(
        &self,
        url: &Url,
        form: &BTreeMap<String, String>,
    ) -> Result<TransportResponse, TransportError>;
}

/// Production transport backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport reusing an existing client (connection pooling).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &Url,
        form: &BTreeMap<String, String>,
    ) -> Result<TransportResponse, TransportError> {
        let resp = self.client.post(url.clone()).form(form).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        debug!(status, "provider send-API responded");
        Ok(TransportResponse { status, body })
    }
}
