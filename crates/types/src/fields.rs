use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Archer field type discriminator.
///
/// Only the values-list distinction drives lookup behavior; the other
/// variants exist so catalogs can round-trip through configuration files
/// without losing information.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum FieldType {
    Text,
    Numeric,
    Date,
    /// Enumerated field stored server-side as internal value ids.
    ValuesList,
    TrackingId,
    CrossReference,
    Other(i64),
}

impl FieldType {
    pub fn is_values_list(self) -> bool {
        matches!(self, Self::ValuesList)
    }
}

impl From<i64> for FieldType {
    fn from(value: i64) -> Self {
        match value {
            1 => Self::Text,
            2 => Self::Numeric,
            3 => Self::Date,
            4 => Self::ValuesList,
            6 => Self::TrackingId,
            9 => Self::CrossReference,
            other => Self::Other(other),
        }
    }
}

impl From<FieldType> for i64 {
    fn from(value: FieldType) -> Self {
        match value {
            FieldType::Text => 1,
            FieldType::Numeric => 2,
            FieldType::Date => 3,
            FieldType::ValuesList => 4,
            FieldType::TrackingId => 6,
            FieldType::CrossReference => 9,
            FieldType::Other(other) => other,
        }
    }
}

/// Per-field metadata keyed by field id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(rename = "Type", alias = "type")]
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new(field_type: FieldType) -> Self {
        Self { field_type }
    }
}

/// Field metadata for one application: display names to ids, ids to descriptors.
///
/// Display names keep the order they were inserted in, which is the order the
/// platform reported them. Lookups by display name are case-insensitive and
/// the first match in that order wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCatalog {
    #[serde(default)]
    names: IndexMap<String, i64>,
    #[serde(default)]
    fields: IndexMap<i64, FieldDescriptor>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field under its display name.
    pub fn insert(&mut self, display_name: impl Into<String>, field_id: i64, descriptor: FieldDescriptor) {
        self.names.insert(display_name.into(), field_id);
        self.fields.insert(field_id, descriptor);
    }

    /// Builder-style variant of [`FieldCatalog::insert`].
    pub fn with_field(mut self, display_name: impl Into<String>, field_id: i64, field_type: FieldType) -> Self {
        self.insert(display_name, field_id, FieldDescriptor::new(field_type));
        self
    }

    /// Display names paired with their field ids, in catalog order.
    pub fn display_names(&self) -> impl Iterator<Item = (&str, i64)> {
        self.names.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn descriptor(&self, field_id: i64) -> Option<&FieldDescriptor> {
        self.fields.get(&field_id)
    }
}
