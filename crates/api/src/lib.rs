//! Archer API client utilities.
//!
//! This crate provides a lightweight client for the two Archer backends used
//! by record lookups. It focuses on:
//!
//! - Constructing an HTTP client with the session authorization header and the
//!   configured TLS policy
//! - Reading and validating connection settings ([`ArcherConfig`])
//! - Reducing every exchange to a [`TransportOutcome`] so callers never handle
//!   transport errors directly
//!
//! The primary entry point is [`ArcherClient`], which implements
//! [`ContentTransport`] for the lookup engine.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use archer_api::{ArcherClient, ContentTransport};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = ArcherClient::from_env()?;
//! let url = client.endpoints().content_directory_url();
//! let outcome = client.get_json(&url, Duration::from_secs(15)).await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

mod config;
mod transport;

pub use config::*;
pub use transport::*;

use std::env;
use std::time::Duration;

use archer_types::ArcherEndpoints;
use archer_util::http::{parse_response_json_strict, truncate_response_preview};
use archer_util::redact_sensitive;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, header};
use serde_json::Value;
use tracing::debug;

const BODY_PREVIEW_LIMIT: usize = 200;

/// Thin wrapper around a configured `reqwest::Client` for Archer access.
///
/// Default headers carry the session authorization and `Accept:
/// application/json`; timeouts are supplied per request by the caller.
#[derive(Debug, Clone)]
pub struct ArcherClient {
    endpoints: ArcherEndpoints,
    http: Client,
    user_agent: String,
}

impl ArcherClient {
    /// Build a client from a validated configuration.
    pub fn new(config: &ArcherConfig) -> Result<Self, ConfigError> {
        let mut default_headers = header::HeaderMap::new();
        let mut authorization =
            header::HeaderValue::from_str(&config.authorization_header()).map_err(|_| ConfigError::InvalidSessionToken)?;
        authorization.set_sensitive(true);
        default_headers.insert(header::AUTHORIZATION, authorization);
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            endpoints: config.endpoints.clone(),
            http,
            user_agent: format!("archer-lookup/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Construct a client from the `ARCHER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(&ArcherConfig::from_env()?)
    }

    pub fn endpoints(&self) -> &ArcherEndpoints {
        &self.endpoints
    }

    /// Build a request for an absolute URL with the configured User-Agent.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!(url = %redact_sensitive(url), %method, "building request");

        self.http.request(method, url).header(header::USER_AGENT, &self.user_agent)
    }

    async fn send(&self, builder: RequestBuilder, timeout: Duration) -> TransportOutcome {
        let response = match builder.timeout(timeout).send().await {
            Ok(response) => response,
            Err(error) => return TransportOutcome::TransportError(redact_sensitive(&error.to_string())),
        };

        let status = response.status();
        let body = response.text().await.map_err(|error| error.to_string());
        classify_response(status, body)
    }
}

/// Map a status and the (possibly unreadable) body to a [`TransportOutcome`].
///
/// The status is classified first: an error status stays an `HttpError` even
/// when its body cannot be read.
fn classify_response(status: StatusCode, body: Result<String, String>) -> TransportOutcome {
    if status.as_u16() >= 400 {
        let body_preview = body
            .map(|text| redact_sensitive(&truncate_response_preview(&text, BODY_PREVIEW_LIMIT)))
            .unwrap_or_default();
        return TransportOutcome::HttpError {
            status: status.as_u16(),
            body_preview,
        };
    }

    let text = match body {
        Ok(text) => text,
        Err(reason) => return TransportOutcome::TransportError(redact_sensitive(&reason)),
    };

    match parse_response_json_strict(&text, Some(status)) {
        Ok(value) => TransportOutcome::Payload(value),
        Err(error) => TransportOutcome::MalformedBody {
            status: status.as_u16(),
            reason: redact_sensitive(&error.to_string()),
        },
    }
}

#[async_trait]
impl ContentTransport for ArcherClient {
    async fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> TransportOutcome {
        let builder = self.request(Method::POST, url).json(body);
        self.send(builder, timeout).await
    }

    async fn get_json(&self, url: &str, timeout: Duration) -> TransportOutcome {
        let builder = self.request(Method::GET, url);
        self.send(builder, timeout).await
    }
}
