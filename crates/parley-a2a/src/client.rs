//! Dispatching client for the upstream agent gateway.
//!
//! One outbound `message/stream` call per chat request. Two terminal failure
//! classes, neither retried: the connection attempt itself failing, or the
//! gateway answering with a non-success status. On success the live response
//! byte stream is handed to the translator untouched.

use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use reqwest::header::ACCEPT;
use tracing::{debug, warn};

use crate::envelope::StreamRequest;

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Boxed live byte stream handed to the translator.
pub type GatewayByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Errors dispatching a stream request to the upstream gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The connection attempt itself failed (DNS, connect, timeout).
    #[error("cannot reach agent gateway at {url}: {source}")]
    Unreachable {
        /// Configured upstream address.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The gateway answered with a non-success status.
    #[error("agent gateway at {url} returned {status}: {body}")]
    Rejected {
        /// Configured upstream address.
        url: String,
        /// Upstream HTTP status.
        status: u16,
        /// Best-effort body capture; empty when capture itself failed.
        body: String,
    },
}

/// HTTP client for the upstream agent gateway.
///
/// Holds the immutable configured address; the underlying connection pool is
/// shared across requests via `Clone`.
#[derive(Clone, Debug)]
pub struct AgentGateway {
    client: reqwest::Client,
    url: String,
}

impl AgentGateway {
    /// Create a gateway client for the configured upstream address.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// The configured upstream address.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Dispatch one streaming send-message call.
    ///
    /// On success the live response byte stream is handed back for
    /// translation; both failure classes are terminal for the request.
    pub async fn stream_message(&self, text: &str) -> GatewayResult<GatewayByteStream> {
        let request = StreamRequest::for_text(text);
        debug!(url = %self.url, request_id = %request.id, "dispatching message/stream");

        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(|source| GatewayError::Unreachable {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %self.url, status = status.as_u16(), "agent gateway rejected the request");
            return Err(GatewayError::Rejected {
                url: self.url.clone(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(Box::pin(response.bytes_stream()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
