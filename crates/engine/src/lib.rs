//! # Archer Lookup Engine
//!
//! Resolves a human-readable field value to the internal id of the Archer
//! record that holds it.
//!
//! A lookup names an application, a field display name, and a value. The
//! engine maps the display name to a field id through the host's metadata,
//! swaps values-list text for its internal id, and queries the platform:
//! the REST record search when a probe finds it, else the OData content API.
//! Zero matches read as "not found"; several matches are reported as
//! ambiguous instead of guessing.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use archer_api::ArcherClient;
//! use archer_engine::{RecordSearcher, StaticMetadata};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = ArcherClient::from_env()?;
//! let endpoints = client.endpoints().clone();
//! let metadata = StaticMetadata::from_path("metadata.yaml".as_ref())?;
//!
//! let searcher = RecordSearcher::new(Arc::new(metadata), Arc::new(client), endpoints);
//! let record_id = searcher.lookup_one("Incidents", "Ticket Number", "INC-1").await?;
//! println!("{record_id:?}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`resolve`**: field display name → field id, raw value → search token
//! - **`normalize`**: record ids out of the payload shapes the platform returns
//! - **`search`**: the REST and content API strategies
//! - **`searcher`**: single and bulk lookup orchestration
//! - **`metadata`**: the metadata seam and a file-backed implementation

pub mod error;
pub mod metadata;
pub mod normalize;
pub mod resolve;
pub mod search;
pub mod searcher;

#[cfg(test)]
mod test_support;

pub use error::{AmbiguousMatch, BulkAmbiguity, LookupError};
pub use metadata::{ApplicationMetadata, MetadataSource, StaticMetadata};
pub use resolve::VALUES_LIST_NO_MATCH;
pub use search::SearchOptions;
pub use searcher::RecordSearcher;
