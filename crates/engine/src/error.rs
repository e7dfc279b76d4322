//! Error types for record lookups.

use archer_types::BulkLookup;
use indexmap::IndexMap;
use thiserror::Error;

/// Errors surfaced by single-value lookups.
///
/// Transport and server failures never appear here: they degrade to "no
/// results" before reaching the orchestrator.
#[derive(Debug, Error)]
pub enum LookupError {
    /// No field display name matched, ignoring case.
    #[error("field with display name \"{field}\" not found in application \"{app}\"")]
    FieldNotFound { app: String, field: String },

    /// The application's module id is missing or not an integer.
    #[error("invalid application level id for \"{app}\": {raw}")]
    InvalidModuleId { app: String, raw: String },

    /// The metadata collaborator failed; its error is passed through as-is.
    #[error(transparent)]
    Metadata(anyhow::Error),

    /// More than one record matched.
    #[error(transparent)]
    Ambiguous(#[from] AmbiguousMatch),
}

impl LookupError {
    pub fn field_not_found(app: impl Into<String>, field: impl Into<String>) -> Self {
        Self::FieldNotFound {
            app: app.into(),
            field: field.into(),
        }
    }

    pub fn invalid_module_id(app: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::InvalidModuleId {
            app: app.into(),
            raw: raw.into(),
        }
    }

    /// Whether the error stems from configuration or metadata rather than data.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Ambiguous(_))
    }
}

/// A single lookup matched several records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("multiple records found for value '{value}' in field '{field}': {record_ids:?}")]
pub struct AmbiguousMatch {
    field: String,
    value: String,
    record_ids: Vec<i64>,
}

impl AmbiguousMatch {
    pub fn new(field: impl Into<String>, value: impl Into<String>, record_ids: Vec<i64>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            record_ids,
        }
    }

    /// Every matching record id, in the order the backend returned them.
    pub fn record_ids(&self) -> &[i64] {
        &self.record_ids
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn into_record_ids(self) -> Vec<i64> {
        self.record_ids
    }
}

/// A bulk lookup finished with at least one ambiguous value.
///
/// Raised only after every input value was processed; it carries the complete
/// result map, not just the failing subset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ambiguous matches found for {} of {} input value(s)", .lookup.ambiguities.len(), .lookup.ids.len())]
pub struct BulkAmbiguity {
    lookup: BulkLookup,
}

impl BulkAmbiguity {
    pub fn new(lookup: BulkLookup) -> Self {
        Self { lookup }
    }

    /// Resolved id (or `None`) for every input value, in input order.
    pub fn resolved(&self) -> &IndexMap<String, Option<i64>> {
        &self.lookup.ids
    }

    /// Matching record ids for each ambiguous value.
    pub fn ambiguities(&self) -> &IndexMap<String, Vec<i64>> {
        &self.lookup.ambiguities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_match_message_names_field_value_and_ids() {
        let error = LookupError::from(AmbiguousMatch::new("Ticket Number", "DUP", vec![1, 2]));
        let message = error.to_string();
        assert!(message.contains("multiple records found"), "{message}");
        assert!(message.contains("[1, 2]"), "{message}");
        assert!(!error.is_configuration());
    }

    #[test]
    fn configuration_errors_are_flagged() {
        assert!(LookupError::field_not_found("App", "Missing").is_configuration());
        assert!(LookupError::invalid_module_id("App", "abc").is_configuration());
    }

    #[test]
    fn bulk_ambiguity_exposes_both_maps() {
        let mut lookup = BulkLookup::new();
        lookup.record_resolved("A", Some(10));
        lookup.record_ambiguous("B", vec![20, 21]);

        let error = BulkAmbiguity::new(lookup);
        assert_eq!(error.resolved()["A"], Some(10));
        assert_eq!(error.resolved()["B"], None);
        assert_eq!(error.ambiguities()["B"], vec![20, 21]);
        assert_eq!(error.to_string(), "ambiguous matches found for 1 of 2 input value(s)");
    }
}
