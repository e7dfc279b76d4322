//! REST record search (`POST core/content/record/search`).

use archer_api::ContentTransport;
use archer_types::{ArcherEndpoints, SearchToken};
use serde_json::{Value, json};
use tracing::debug;

use super::SearchOptions;
use crate::normalize::record_ids_from_search;

/// Filter value sent by the capability probe. No record is expected to match it.
pub const PROBE_SENTINEL: &str = "__PROBE__";

/// Client for the structured record search endpoint.
pub struct RecordSearchApi<'a> {
    transport: &'a dyn ContentTransport,
    endpoints: &'a ArcherEndpoints,
    options: SearchOptions,
}

impl<'a> RecordSearchApi<'a> {
    pub fn new(transport: &'a dyn ContentTransport, endpoints: &'a ArcherEndpoints, options: SearchOptions) -> Self {
        Self {
            transport,
            endpoints,
            options,
        }
    }

    /// Check whether the endpoint exists on this platform version.
    ///
    /// Only the route matters: 404/405 or a failed request mean "unsupported";
    /// any other answer, even an error about the filter, means "supported".
    pub async fn probe(&self, module_id: i64) -> bool {
        let outcome = self
            .transport
            .post_json(&self.endpoints.record_search_url(), &probe_body(module_id), self.options.probe_timeout)
            .await;
        let supported = outcome.probe_supported();
        debug!(module_id, supported, "probed record search endpoint");
        supported
    }

    /// Record ids whose field `field_id` equals `token`.
    ///
    /// Never fails: error statuses, unreadable bodies, and transport failures
    /// all yield an empty list.
    pub async fn search(&self, module_id: i64, field_id: i64, token: &SearchToken) -> Vec<i64> {
        let body = search_body(module_id, field_id, token, self.options.page_size);
        let outcome = self
            .transport
            .post_json(&self.endpoints.record_search_url(), &body, self.options.search_timeout)
            .await;

        outcome
            .into_payload("record search")
            .map(|payload| record_ids_from_search(&payload))
            .unwrap_or_default()
    }
}

/// One-row search on field 0, used to detect the endpoint.
pub fn probe_body(module_id: i64) -> Value {
    json!({
        "ModuleId": module_id,
        "Page": { "Start": 0, "Size": 1 },
        "Filters": [{ "FieldId": 0, "Operator": "Equals", "Value": PROBE_SENTINEL }],
    })
}

/// Equality search returning only record ids.
pub fn search_body(module_id: i64, field_id: i64, token: &SearchToken, page_size: u32) -> Value {
    json!({
        "ModuleId": module_id,
        "Page": { "Start": 0, "Size": page_size },
        "Filters": [{ "FieldId": field_id, "Operator": "Equals", "Value": token }],
        "ReturnFields": ["Id"],
    })
}
