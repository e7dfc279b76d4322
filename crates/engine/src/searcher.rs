//! Lookup orchestration.
//!
//! [`RecordSearcher`] resolves a field, computes the search token, picks the
//! backend the platform supports, and classifies what comes back. Bulk
//! lookups repeat the single lookup for each value, in input order.

use std::sync::Arc;

use archer_api::ContentTransport;
use archer_types::{ArcherEndpoints, BulkLookup, MatchResult};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::error::{AmbiguousMatch, BulkAmbiguity, LookupError};
use crate::metadata::MetadataSource;
use crate::resolve::{resolve_field, search_token};
use crate::search::SearchOptions;
use crate::search::fallback::ContentSearchApi;
use crate::search::primary::RecordSearchApi;

/// Finds record ids by field value within an Archer application.
pub struct RecordSearcher {
    metadata: Arc<dyn MetadataSource>,
    transport: Arc<dyn ContentTransport>,
    endpoints: ArcherEndpoints,
    options: SearchOptions,
}

impl RecordSearcher {
    pub fn new(metadata: Arc<dyn MetadataSource>, transport: Arc<dyn ContentTransport>, endpoints: ArcherEndpoints) -> Self {
        Self {
            metadata,
            transport,
            endpoints,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Look up the records of `app_name` whose `field_display_name` equals `value`.
    ///
    /// # Errors
    /// Metadata failures, unknown field names, and unusable module ids. Network
    /// and server failures are not errors: they read as [`MatchResult::NotFound`].
    pub async fn find_record(&self, app_name: &str, field_display_name: &str, value: &str) -> Result<MatchResult, LookupError> {
        let field = resolve_field(self.metadata.as_ref(), app_name, field_display_name).await?;

        let module_id = match self.metadata.module_id(app_name) {
            Some(raw) => raw
                .parse()
                .map_err(|error| LookupError::invalid_module_id(app_name, error.raw))?,
            None => return Err(LookupError::invalid_module_id(app_name, "<missing>")),
        };

        let token = search_token(self.metadata.as_ref(), &field, field_display_name, value).await?;

        let record_search = RecordSearchApi::new(self.transport.as_ref(), &self.endpoints, self.options);
        let ids = if record_search.probe(module_id).await {
            record_search.search(module_id, field.field_id, &token).await
        } else {
            info!(app = app_name, "record search unavailable; using content API");
            let content_search = ContentSearchApi::new(self.transport.as_ref(), &self.endpoints, self.options);
            let Some(endpoint) = content_search.discover_endpoint(app_name).await else {
                warn!(app = app_name, "no content API endpoint found for application");
                return Ok(MatchResult::NotFound);
            };
            content_search.search(&endpoint, field_display_name, value).await
        };

        let result = MatchResult::from_ids(ids);
        debug!(app = app_name, field = field_display_name, value, result = ?result, "lookup finished");
        Ok(result)
    }

    /// Single record id for `value`, or `None` when nothing matched.
    ///
    /// # Errors
    /// Everything [`Self::find_record`] returns, plus [`LookupError::Ambiguous`]
    /// when several records matched.
    pub async fn lookup_one(&self, app_name: &str, field_display_name: &str, value: &str) -> Result<Option<i64>, LookupError> {
        match self.find_record(app_name, field_display_name, value).await? {
            MatchResult::NotFound => Ok(None),
            MatchResult::Found(id) => Ok(Some(id)),
            MatchResult::Ambiguous(ids) => Err(AmbiguousMatch::new(field_display_name, value, ids).into()),
        }
    }

    /// Look up every value, recording ambiguities instead of failing on them.
    ///
    /// Values whose lookup fails for any other reason map to `None`.
    pub async fn collect_bulk<I, S>(&self, app_name: &str, field_display_name: &str, values: I) -> BulkLookup
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lookup = BulkLookup::new();
        for value in values {
            let value = value.as_ref();
            match self.lookup_one(app_name, field_display_name, value).await {
                Ok(record_id) => lookup.record_resolved(value, record_id),
                Err(LookupError::Ambiguous(ambiguous)) => lookup.record_ambiguous(value, ambiguous.into_record_ids()),
                Err(error) => {
                    debug!(value, %error, "bulk lookup failed for value");
                    lookup.record_resolved(value, None);
                }
            }
        }
        lookup
    }

    /// Look up every value, failing at the end if any of them was ambiguous.
    ///
    /// # Errors
    /// [`BulkAmbiguity`] with the complete result maps when at least one value
    /// matched several records.
    pub async fn lookup_bulk<I, S>(
        &self,
        app_name: &str,
        field_display_name: &str,
        values: I,
    ) -> Result<IndexMap<String, Option<i64>>, BulkAmbiguity>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lookup = self.collect_bulk(app_name, field_display_name, values).await;
        if lookup.has_ambiguities() {
            return Err(BulkAmbiguity::new(lookup));
        }
        Ok(lookup.ids)
    }
}
