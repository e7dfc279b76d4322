//! Shared data model for Archer record lookups.
//!
//! The types in this crate are plain data: they carry no I/O and are shared
//! between the HTTP client (`archer-api`), the lookup engine
//! (`archer-engine`), and the command-line front end.

mod fields;
mod lookup;

pub use fields::*;
pub use lookup::*;

use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

/// Base URLs of the two Archer backends consulted by a lookup.
///
/// Both values are expected to end with `/` so that relative paths can be
/// appended verbatim (for example `https://grc.example.com/RSAarcher/api/`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcherEndpoints {
    /// Base of the REST API (`.../api/`).
    pub api_base: String,
    /// Base of the OData content API (`.../contentapi/`).
    pub content_api_base: String,
}

impl ArcherEndpoints {
    pub fn new(api_base: impl Into<String>, content_api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            content_api_base: content_api_base.into(),
        }
    }

    /// URL of the structured record search endpoint.
    pub fn record_search_url(&self) -> String {
        format!("{}core/content/record/search", self.api_base)
    }

    /// URL of the content API directory listing.
    pub fn content_directory_url(&self) -> String {
        self.content_api_base.clone()
    }
}

/// Module identifier as reported by the metadata collaborator.
///
/// Hosts store the level/module id either as a number or as the string they
/// read from the platform; the lookup needs an integer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawModuleId {
    Number(i64),
    Text(String),
}

impl RawModuleId {
    /// Parse the raw identifier into the integer sent as `ModuleId`.
    pub fn parse(&self) -> Result<i64, ParseModuleIdError> {
        match self {
            Self::Number(id) => Ok(*id),
            Self::Text(text) => text.trim().parse::<i64>().map_err(|_| ParseModuleIdError { raw: text.clone() }),
        }
    }
}

impl fmt::Display for RawModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for RawModuleId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawModuleId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Returned when a module id is not a valid integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModuleIdError {
    pub raw: String,
}

impl fmt::Display for ParseModuleIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid application level id: '{}'", self.raw)
    }
}

impl Error for ParseModuleIdError {}
