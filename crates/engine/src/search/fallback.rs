//! OData content API search.
//!
//! Older platforms lack the REST search route. The content API exposes one
//! resource per application, listed in a directory at its base URL; lookups
//! find the application's resource there and filter it by field text.

use archer_api::ContentTransport;
use archer_types::{ArcherEndpoints, EndpointDirectory};
use archer_util::encode_form_component;
use tracing::debug;

use super::SearchOptions;
use crate::normalize::record_ids_from_content;

/// Client for the content API directory and its per-application resources.
pub struct ContentSearchApi<'a> {
    transport: &'a dyn ContentTransport,
    endpoints: &'a ArcherEndpoints,
    options: SearchOptions,
}

impl<'a> ContentSearchApi<'a> {
    pub fn new(transport: &'a dyn ContentTransport, endpoints: &'a ArcherEndpoints, options: SearchOptions) -> Self {
        Self {
            transport,
            endpoints,
            options,
        }
    }

    /// Find the resource path serving `app_name`.
    ///
    /// Returns `None` when the directory cannot be read or lists no matching entry.
    pub async fn discover_endpoint(&self, app_name: &str) -> Option<String> {
        let payload = self
            .transport
            .get_json(&self.endpoints.content_directory_url(), self.options.search_timeout)
            .await
            .into_payload("content directory")?;

        let directory: EndpointDirectory = match serde_json::from_value(payload) {
            Ok(directory) => directory,
            Err(error) => {
                debug!(%error, "content directory has an unexpected shape");
                return None;
            }
        };

        let endpoint = select_endpoint(&directory, app_name);
        debug!(app = app_name, endpoint = ?endpoint, "discovered content endpoint");
        endpoint
    }

    /// Record ids in `endpoint` whose `field_display_name` equals `value`.
    pub async fn search(&self, endpoint: &str, field_display_name: &str, value: &str) -> Vec<i64> {
        let url = content_query_url(self.endpoints, endpoint, field_display_name, value);
        self.transport
            .get_json(&url, self.options.search_timeout)
            .await
            .into_payload("content search")
            .map(|payload| record_ids_from_content(&payload, &format!("{endpoint}_Id")))
            .unwrap_or_default()
    }
}

/// Pick the directory entry for `app_name`: an exact name first, else the
/// first name containing it.
pub fn select_endpoint(directory: &EndpointDirectory, app_name: &str) -> Option<String> {
    directory
        .value
        .iter()
        .find(|entry| entry.name() == app_name)
        .or_else(|| directory.value.iter().find(|entry| entry.name().contains(app_name)))
        .and_then(|entry| entry.url.clone())
}

/// `<content base><endpoint>?$filter=<field> eq '<value>'&$select=<endpoint>_Id`
///
/// The filter is sent verbatim apart from form encoding; quotes inside
/// `value` are not escaped.
pub fn content_query_url(endpoints: &ArcherEndpoints, endpoint: &str, field_display_name: &str, value: &str) -> String {
    let filter = format!("{field_display_name} eq '{value}'");
    format!(
        "{}{endpoint}?$filter={}&$select={endpoint}_Id",
        endpoints.content_api_base,
        encode_form_component(&filter)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedTransport, endpoints, http_error};
    use archer_api::TransportOutcome;
    use archer_types::EndpointEntry;
    use serde_json::json;

    fn entry(name: Option<&str>, url: Option<&str>) -> EndpointEntry {
        EndpointEntry {
            name: name.map(str::to_string),
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn exact_names_win_over_earlier_substring_matches() {
        let directory = EndpointDirectory {
            value: vec![
                entry(Some("Incidents Archive"), Some("IncidentsArchive")),
                entry(Some("Incidents"), Some("Incidents")),
            ],
        };
        assert_eq!(select_endpoint(&directory, "Incidents"), Some("Incidents".into()));
    }

    #[test]
    fn first_substring_match_is_used_without_an_exact_name() {
        let directory = EndpointDirectory {
            value: vec![
                entry(None, Some("Unnamed")),
                entry(Some("Vendor Incidents"), Some("VendorIncidents")),
                entry(Some("Incidents Archive"), Some("IncidentsArchive")),
            ],
        };
        assert_eq!(select_endpoint(&directory, "Incidents"), Some("VendorIncidents".into()));
        assert_eq!(select_endpoint(&directory, "Policies"), None);
    }

    #[test]
    fn query_url_form_encodes_the_filter() {
        let url = content_query_url(&endpoints(), "Incidents", "Ticket Number", "INC-1");
        assert_eq!(
            url,
            "https://grc.example.com/contentapi/Incidents?$filter=Ticket+Number+eq+%27INC-1%27&$select=Incidents_Id"
        );
    }

    #[tokio::test]
    async fn discovery_reads_the_directory_listing() {
        let transport = ScriptedTransport::new([TransportOutcome::Payload(json!({
            "value": [{ "name": "Incidents", "url": "Incidents" }]
        }))]);
        let endpoints = endpoints();
        let api = ContentSearchApi::new(&transport, &endpoints, SearchOptions::default());

        assert_eq!(api.discover_endpoint("Incidents").await, Some("Incidents".into()));
        let requests = transport.requests();
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].url, "https://grc.example.com/contentapi/");
    }

    #[tokio::test]
    async fn discovery_failures_yield_no_endpoint() {
        let transport = ScriptedTransport::new([
            http_error(500),
            TransportOutcome::Payload(json!({ "value": "not a list" })),
            TransportOutcome::Payload(json!({ "value": [] })),
        ]);
        let endpoints = endpoints();
        let api = ContentSearchApi::new(&transport, &endpoints, SearchOptions::default());

        assert_eq!(api.discover_endpoint("Incidents").await, None);
        assert_eq!(api.discover_endpoint("Incidents").await, None);
        assert_eq!(api.discover_endpoint("Incidents").await, None);
    }

    #[tokio::test]
    async fn search_reads_conventional_id_key() {
        let transport = ScriptedTransport::new([TransportOutcome::Payload(json!({
            "value": [{ "Incidents_Id": 222 }]
        }))]);
        let endpoints = endpoints();
        let api = ContentSearchApi::new(&transport, &endpoints, SearchOptions::default());

        assert_eq!(api.search("Incidents", "Ticket Number", "INC-1").await, vec![222]);
    }

    #[tokio::test]
    async fn search_errors_yield_no_ids() {
        let transport = ScriptedTransport::new([http_error(400)]);
        let endpoints = endpoints();
        let api = ContentSearchApi::new(&transport, &endpoints, SearchOptions::default());

        assert!(api.search("Incidents", "Ticket Number", "INC-1").await.is_empty());
    }
}
