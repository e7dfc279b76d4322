//! Transport seam between the lookup engine and the network.
//!
//! Every call made by a lookup resolves to a [`TransportOutcome`]; nothing on
//! this path returns `Err`. The single place where failures turn into "no
//! data" is [`TransportOutcome::into_payload`].

use std::time::Duration;

use archer_util::http::status_error_message;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error};

/// Result of one HTTP exchange with an Archer backend.
#[derive(Clone, Debug, PartialEq)]
pub enum TransportOutcome {
    /// Status below 400 with a JSON body.
    Payload(Value),
    /// Status 400 or above.
    HttpError { status: u16, body_preview: String },
    /// Status below 400 whose body was not JSON.
    MalformedBody { status: u16, reason: String },
    /// Connection failure, timeout, or unreadable body.
    TransportError(String),
}

impl TransportOutcome {
    /// Whether a capability probe that produced this outcome found the route.
    ///
    /// 404 and 405 mean the route is absent; a transport failure is read the
    /// same way so callers fall back. Any other response, including error
    /// statuses and non-JSON bodies, proves the route exists.
    pub fn probe_supported(&self) -> bool {
        match self {
            Self::HttpError { status: 404 | 405, .. } | Self::TransportError(_) => false,
            Self::Payload(_) | Self::HttpError { .. } | Self::MalformedBody { .. } => true,
        }
    }

    /// Turn the outcome into a payload, logging and dropping every failure.
    ///
    /// Server errors and outages become indistinguishable from an empty
    /// result here; `operation` names the call in the log line.
    pub fn into_payload(self, operation: &str) -> Option<Value> {
        match self {
            Self::Payload(value) => Some(value),
            Self::HttpError { status, body_preview } => {
                let hint = status_error_message(status).unwrap_or_default();
                debug!(operation, status, body = %body_preview, %hint, "request returned error status; treating as no results");
                None
            }
            Self::MalformedBody { status, reason } => {
                error!(operation, status, %reason, "response body was not JSON; treating as no results");
                None
            }
            Self::TransportError(reason) => {
                error!(operation, %reason, "request failed; treating as no results");
                None
            }
        }
    }
}

/// HTTP operations a lookup needs from its host.
///
/// Implementations attach the session authorization header and apply the TLS
/// policy; callers pass absolute URLs and a per-call timeout.
#[async_trait]
pub trait ContentTransport: Send + Sync {
    /// POST `body` as JSON to `url`.
    async fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> TransportOutcome;

    /// GET `url`, expecting JSON.
    async fn get_json(&self, url: &str, timeout: Duration) -> TransportOutcome;
}
