use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Value submitted to the structured search endpoint.
///
/// Serializes untagged, so the request body carries either a JSON string or a
/// JSON integer in the filter's `Value` slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchToken {
    /// The caller's raw value, used for free-text fields.
    Text(String),
    /// Internal value-list id substituted for values-list fields.
    ValuesListId(i64),
}

/// Outcome of a single lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchResult {
    NotFound,
    Found(i64),
    /// Two or more records matched, in the order the backend returned them.
    Ambiguous(Vec<i64>),
}

impl MatchResult {
    /// Classify the ids a backend returned.
    pub fn from_ids(ids: Vec<i64>) -> Self {
        match ids.as_slice() {
            [] => Self::NotFound,
            [id] => Self::Found(*id),
            _ => Self::Ambiguous(ids),
        }
    }

    /// The resolved id when exactly one record matched.
    pub fn record_id(&self) -> Option<i64> {
        match self {
            Self::Found(id) => Some(*id),
            _ => None,
        }
    }
}

/// Results of a bulk lookup.
///
/// `ids` holds one entry per distinct input value, in input order. Values
/// that did not resolve for any reason map to `None`; values that matched
/// several records additionally appear in `ambiguities`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BulkLookup {
    pub ids: IndexMap<String, Option<i64>>,
    pub ambiguities: IndexMap<String, Vec<i64>>,
}

impl BulkLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_resolved(&mut self, value: &str, record_id: Option<i64>) {
        self.ids.insert(value.to_string(), record_id);
    }

    pub fn record_ambiguous(&mut self, value: &str, record_ids: Vec<i64>) {
        self.ids.insert(value.to_string(), None);
        self.ambiguities.insert(value.to_string(), record_ids);
    }

    pub fn has_ambiguities(&self) -> bool {
        !self.ambiguities.is_empty()
    }
}

/// One entry of the content API directory listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct EndpointEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl EndpointEntry {
    /// Entry name, with a missing name read as empty.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Content API directory listing (`{"value": [...]}`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct EndpointDirectory {
    #[serde(default)]
    pub value: Vec<EndpointEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn match_result_classifies_by_count() {
        assert_eq!(MatchResult::from_ids(vec![]), MatchResult::NotFound);
        assert_eq!(MatchResult::from_ids(vec![555]), MatchResult::Found(555));
        assert_eq!(MatchResult::from_ids(vec![1, 2]), MatchResult::Ambiguous(vec![1, 2]));
        assert_eq!(MatchResult::Found(7).record_id(), Some(7));
        assert_eq!(MatchResult::Ambiguous(vec![1, 2]).record_id(), None);
    }

    #[test]
    fn search_token_serializes_as_bare_json_value() {
        assert_eq!(serde_json::to_value(SearchToken::Text("INC-1".into())).unwrap(), json!("INC-1"));
        assert_eq!(serde_json::to_value(SearchToken::ValuesListId(999)).unwrap(), json!(999));
    }

    #[test]
    fn bulk_lookup_keeps_ambiguous_values_in_id_map() {
        let mut bulk = BulkLookup::new();
        bulk.record_resolved("A", Some(1));
        bulk.record_ambiguous("B", vec![2, 3]);
        bulk.record_resolved("C", None);

        assert_eq!(bulk.ids.keys().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert_eq!(bulk.ids["B"], None);
        assert_eq!(bulk.ambiguities["B"], vec![2, 3]);
        assert!(bulk.has_ambiguities());
    }

    #[test]
    fn endpoint_directory_tolerates_missing_fields() {
        let directory: EndpointDirectory =
            serde_json::from_value(json!({ "value": [{ "url": "Orphan" }, { "name": "App", "url": "App" }] })).unwrap();
        assert_eq!(directory.value[0].name(), "");
        assert_eq!(directory.value[1].url.as_deref(), Some("App"));

        let empty: EndpointDirectory = serde_json::from_value(json!({})).unwrap();
        assert!(empty.value.is_empty());
    }
}
