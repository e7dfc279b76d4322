//! Application metadata consumed by lookups.
//!
//! The host owns the metadata: field names, field types, module ids, and
//! values-list contents. Lookups read it through [`MetadataSource`] and
//! refresh it before every field resolution.
//!
//! [`StaticMetadata`] is a file-backed implementation for hosts that keep
//! this information in configuration instead of fetching it from the
//! platform.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use archer_types::{FieldCatalog, RawModuleId};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

/// Metadata collaborator used by [`crate::RecordSearcher`].
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Refresh the metadata of `app_name` and make it the current application.
    async fn load_application(&self, app_name: &str) -> Result<()>;

    /// Field metadata of `app_name`, if it has been loaded.
    fn field_catalog(&self, app_name: &str) -> Option<FieldCatalog>;

    /// Internal ids of values-list entries matching `value` in the current application.
    async fn resolve_values_list_ids(&self, field_name: &str, value: &str) -> Result<Vec<i64>>;

    /// Module (level) id of `app_name` as the host stores it.
    fn module_id(&self, app_name: &str) -> Option<RawModuleId>;
}

/// Metadata for one application as written in a metadata file.
#[derive(Clone, Debug, Deserialize)]
pub struct ApplicationMetadata {
    pub module_id: RawModuleId,
    #[serde(default)]
    pub catalog: FieldCatalog,
    /// Field display name → value text → internal value ids.
    #[serde(default)]
    pub values_lists: IndexMap<String, IndexMap<String, Vec<i64>>>,
}

impl ApplicationMetadata {
    pub fn new(module_id: impl Into<RawModuleId>, catalog: FieldCatalog) -> Self {
        Self {
            module_id: module_id.into(),
            catalog,
            values_lists: IndexMap::new(),
        }
    }

    /// Register the internal ids of one values-list entry.
    pub fn with_values_list_entry(mut self, field_name: impl Into<String>, value: impl Into<String>, ids: Vec<i64>) -> Self {
        self.values_lists.entry(field_name.into()).or_default().insert(value.into(), ids);
        self
    }

    fn values_list_ids(&self, field_name: &str, value: &str) -> Vec<i64> {
        self.values_lists
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field_name))
            .and_then(|(_, values)| values.get(value))
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
struct MetadataFile {
    #[serde(default)]
    applications: IndexMap<String, ApplicationMetadata>,
}

/// In-memory metadata loaded from YAML or JSON.
///
/// ```yaml
/// applications:
///   Incidents:
///     module_id: 75
///     catalog:
///       names: { Ticket Number: 10, Status: 20 }
///       fields: { 10: { Type: 1 }, 20: { Type: 4 } }
///     values_lists:
///       Status: { Open: [999] }
/// ```
#[derive(Debug, Default)]
pub struct StaticMetadata {
    applications: IndexMap<String, ApplicationMetadata>,
    current: Mutex<Option<String>>,
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of one application.
    pub fn with_application(mut self, app_name: impl Into<String>, metadata: ApplicationMetadata) -> Self {
        self.applications.insert(app_name.into(), metadata);
        self
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: MetadataFile = serde_yaml::from_str(content).context("parse YAML metadata document")?;
        Ok(Self::from_file(file))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: MetadataFile = serde_json::from_str(content).context("parse JSON metadata document")?;
        Ok(Self::from_file(file))
    }

    /// Read a metadata document from disk; `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| format!("read metadata file {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };
        parsed.with_context(|| format!("load metadata file {}", path.display()))
    }

    fn from_file(file: MetadataFile) -> Self {
        Self {
            applications: file.applications,
            current: Mutex::new(None),
        }
    }

    pub fn application_names(&self) -> impl Iterator<Item = &str> {
        self.applications.keys().map(String::as_str)
    }

    fn current_application(&self) -> Result<Option<String>> {
        let current = self.current.lock().map_err(|_| anyhow!("metadata lock poisoned"))?;
        Ok(current.clone())
    }
}

#[async_trait]
impl MetadataSource for StaticMetadata {
    async fn load_application(&self, app_name: &str) -> Result<()> {
        if !self.applications.contains_key(app_name) {
            return Err(anyhow!("application \"{app_name}\" not found in metadata"));
        }
        let mut current = self.current.lock().map_err(|_| anyhow!("metadata lock poisoned"))?;
        *current = Some(app_name.to_string());
        debug!(app = app_name, "loaded application metadata");
        Ok(())
    }

    fn field_catalog(&self, app_name: &str) -> Option<FieldCatalog> {
        self.applications.get(app_name).map(|metadata| metadata.catalog.clone())
    }

    async fn resolve_values_list_ids(&self, field_name: &str, value: &str) -> Result<Vec<i64>> {
        let app_name = self
            .current_application()?
            .ok_or_else(|| anyhow!("no application loaded before values-list resolution"))?;
        Ok(self
            .applications
            .get(&app_name)
            .map(|metadata| metadata.values_list_ids(field_name, value))
            .unwrap_or_default())
    }

    fn module_id(&self, app_name: &str) -> Option<RawModuleId> {
        self.applications.get(app_name).map(|metadata| metadata.module_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOCUMENT: &str = r#"
applications:
  Incidents:
    module_id: "75"
    catalog:
      names:
        Ticket Number: 10
        Status: 20
      fields:
        10: { Type: 1 }
        20: { Type: 4 }
    values_lists:
      Status:
        Open: [999]
"#;

    #[tokio::test]
    async fn resolves_values_lists_for_the_loaded_application() {
        let metadata = StaticMetadata::from_yaml_str(DOCUMENT).expect("metadata");
        metadata.load_application("Incidents").await.expect("load");

        assert_eq!(metadata.resolve_values_list_ids("status", "Open").await.unwrap(), vec![999]);
        assert!(metadata.resolve_values_list_ids("Status", "Closed").await.unwrap().is_empty());
        assert_eq!(metadata.module_id("Incidents"), Some(RawModuleId::Text("75".into())));
        let catalog = metadata.field_catalog("Incidents").unwrap();
        assert!(catalog.descriptor(20).unwrap().field_type.is_values_list());
    }

    #[tokio::test]
    async fn unknown_application_fails_to_load() {
        let metadata = StaticMetadata::from_yaml_str(DOCUMENT).expect("metadata");
        let error = metadata.load_application("Vendors").await.unwrap_err();
        assert!(error.to_string().contains("Vendors"));
    }

    #[tokio::test]
    async fn values_list_resolution_requires_a_loaded_application() {
        let metadata = StaticMetadata::from_yaml_str(DOCUMENT).expect("metadata");
        assert!(metadata.resolve_values_list_ids("Status", "Open").await.is_err());
    }

    #[test]
    fn loads_json_documents_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().expect("temp file");
        write!(
            file,
            r#"{{"applications": {{"Vendors": {{"module_id": 12, "catalog": {{"names": {{"Name": 5}}, "fields": {{"5": {{"Type": 1}}}}}}}}}}}}"#
        )
        .expect("write metadata");

        let metadata = StaticMetadata::from_path(file.path()).expect("metadata from disk");
        assert_eq!(metadata.application_names().collect::<Vec<_>>(), vec!["Vendors"]);
        assert_eq!(metadata.module_id("Vendors"), Some(RawModuleId::Number(12)));
    }
}
