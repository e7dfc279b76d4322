//! Connection settings for an Archer instance.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ARCHER_API_BASE` | required | REST API base URL, ending in `/` |
//! | `ARCHER_CONTENT_API_BASE` | required | Content API base URL, ending in `/` |
//! | `ARCHER_SESSION_TOKEN` | required | Session token for the `Authorization` header |
//! | `ARCHER_ACCEPT_INVALID_CERTS` | `true` | Skip TLS certificate verification |

use std::env;

use archer_types::ArcherEndpoints;
use reqwest::Url;
use thiserror::Error;

pub const API_BASE_ENV: &str = "ARCHER_API_BASE";
pub const CONTENT_API_BASE_ENV: &str = "ARCHER_CONTENT_API_BASE";
pub const SESSION_TOKEN_ENV: &str = "ARCHER_SESSION_TOKEN";
pub const ACCEPT_INVALID_CERTS_ENV: &str = "ARCHER_ACCEPT_INVALID_CERTS";

/// Hostnames allowed to use plain `http`.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Errors raised while building a client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid {name} '{value}': {reason}")]
    InvalidBaseUrl { name: &'static str, value: String, reason: String },

    #[error("invalid value '{value}' for {name}; expected true or false")]
    InvalidFlag { name: &'static str, value: String },

    #[error("session token cannot be used in an HTTP header")]
    InvalidSessionToken,

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Everything the HTTP client needs to talk to one Archer instance.
#[derive(Clone, Debug)]
pub struct ArcherConfig {
    pub endpoints: ArcherEndpoints,
    /// Raw session token; sent as `Authorization: Archer session-id=<token>`.
    pub session_token: String,
    /// Accept self-signed or otherwise invalid TLS certificates.
    ///
    /// Archer deployments are commonly fronted by internal certificates, so
    /// verification is off unless explicitly enabled.
    pub accept_invalid_certs: bool,
}

impl ArcherConfig {
    /// Build a validated configuration.
    pub fn new(
        api_base: impl Into<String>,
        content_api_base: impl Into<String>,
        session_token: impl Into<String>,
        accept_invalid_certs: bool,
    ) -> Result<Self, ConfigError> {
        let endpoints = ArcherEndpoints::new(api_base, content_api_base);
        validate_base_url(API_BASE_ENV, &endpoints.api_base)?;
        validate_base_url(CONTENT_API_BASE_ENV, &endpoints.content_api_base)?;
        Ok(Self {
            endpoints,
            session_token: session_token.into(),
            accept_invalid_certs,
        })
    }

    /// Read the configuration from the `ARCHER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base = required_var(API_BASE_ENV)?;
        let content_api_base = required_var(CONTENT_API_BASE_ENV)?;
        let session_token = required_var(SESSION_TOKEN_ENV)?;
        let accept_invalid_certs = match env::var(ACCEPT_INVALID_CERTS_ENV) {
            Ok(value) => parse_flag(ACCEPT_INVALID_CERTS_ENV, &value)?,
            Err(_) => true,
        };
        Self::new(api_base, content_api_base, session_token, accept_invalid_certs)
    }

    /// Value of the `Authorization` header sent with every request.
    pub fn authorization_header(&self) -> String {
        format!("Archer session-id={}", self.session_token)
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - must parse and include a host
/// - must end with `/` so relative paths can be appended verbatim
/// - `localhost` or `127.0.0.1`: `http` or `https`
/// - otherwise: `https` only
fn validate_base_url(name: &'static str, base: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        name,
        value: base.to_string(),
        reason,
    };

    let parsed_base_url = Url::parse(base).map_err(|error| invalid(error.to_string()))?;
    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| invalid("URL must include a host".to_string()))?;

    if !base.ends_with('/') {
        return Err(invalid("URL must end with '/'".to_string()));
    }

    let scheme = parsed_base_url.scheme();
    let is_local = LOCALHOST_DOMAINS.iter().any(|&allowed| host_name.eq_ignore_ascii_case(allowed));
    match (scheme, is_local) {
        ("https", _) | ("http", true) => Ok(()),
        _ => Err(invalid(format!("scheme '{scheme}://' is not allowed; non-localhost hosts must use https"))),
    }
}
