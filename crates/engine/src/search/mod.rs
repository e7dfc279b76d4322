//! The two backends a lookup can query.
//!
//! - [`primary`]: the REST record search endpoint, guarded by a capability probe
//! - [`fallback`]: the OData content API, reached through its directory listing

pub mod fallback;
pub mod primary;

use std::time::Duration;

/// Page size used by lookups: enough rows to tell one match from many.
pub const DEFAULT_PAGE_SIZE: u32 = 2;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Tunables shared by both strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOptions {
    pub page_size: u32,
    pub probe_timeout: Duration,
    pub search_timeout: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }
}
