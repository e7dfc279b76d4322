//! Field resolution and search-token computation.
//!
//! Both steps read the host's metadata: the field resolver maps a display name
//! to a field id, and the value normalizer decides whether the raw value must
//! be replaced by an internal values-list id before searching.

use archer_types::{FieldCatalog, FieldDescriptor, SearchToken};
use tracing::debug;

use crate::error::LookupError;
use crate::metadata::MetadataSource;

/// Token searched for when a values-list entry does not exist.
///
/// No record stores this text, so the search deterministically returns
/// nothing instead of matching some other value.
pub const VALUES_LIST_NO_MATCH: &str = "__VALUES_LIST_NO_MATCH__";

/// A field display name resolved against the application's metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedField {
    pub field_id: i64,
    pub descriptor: Option<FieldDescriptor>,
}

impl ResolvedField {
    pub fn is_values_list(&self) -> bool {
        self.descriptor
            .as_ref()
            .map(|descriptor| descriptor.field_type.is_values_list())
            .unwrap_or(false)
    }
}

/// Refresh the application's metadata, then resolve `field_display_name`.
///
/// Matching ignores case; the first display name in catalog order wins.
/// Metadata load failures propagate unchanged.
pub async fn resolve_field(metadata: &dyn MetadataSource, app_name: &str, field_display_name: &str) -> Result<ResolvedField, LookupError> {
    metadata.load_application(app_name).await.map_err(LookupError::Metadata)?;
    let catalog = metadata.field_catalog(app_name).unwrap_or_default();

    find_field(&catalog, field_display_name).ok_or_else(|| LookupError::field_not_found(app_name, field_display_name))
}

/// Case-insensitive display-name match within a catalog.
pub fn find_field(catalog: &FieldCatalog, field_display_name: &str) -> Option<ResolvedField> {
    let target = field_display_name.to_lowercase();
    catalog
        .display_names()
        .find(|(name, _)| name.to_lowercase() == target)
        .map(|(_, field_id)| ResolvedField {
            field_id,
            descriptor: catalog.descriptor(field_id).cloned(),
        })
}

/// Compute the value submitted to the structured search.
///
/// Values-list fields are stored by internal id server-side, so the raw text
/// is swapped for the first id the host resolves; when it resolves none, the
/// [`VALUES_LIST_NO_MATCH`] sentinel is searched instead.
pub async fn search_token(
    metadata: &dyn MetadataSource,
    field: &ResolvedField,
    field_display_name: &str,
    value: &str,
) -> Result<SearchToken, LookupError> {
    if !field.is_values_list() {
        return Ok(SearchToken::Text(value.to_string()));
    }

    let ids = metadata
        .resolve_values_list_ids(field_display_name, value)
        .await
        .map_err(LookupError::Metadata)?;
    match ids.first() {
        Some(id) => Ok(SearchToken::ValuesListId(*id)),
        None => {
            debug!(field = field_display_name, value, "no values-list entry matched; searching for sentinel");
            Ok(SearchToken::Text(VALUES_LIST_NO_MATCH.to_string()))
        }
    }
}
