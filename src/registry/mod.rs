//! Remote dataset registry: entry schema, lookup index, and listing sources.
//! The hub listing is fetched once per run (see [`hub::HubClient`]) or read from a saved file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::ExportConfig;
use crate::error::CatalogError;

pub mod hub;

pub use hub::HubClient;

/// One dataset as listed by the hub. Unknown keys in the listing are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    /// Kept as the hub wrote it; copied verbatim into the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
}

impl RegistryEntry {
    pub fn is_private(&self) -> bool {
        self.private.unwrap_or(false)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a listing page or saved listing. The payload must be a JSON array; entries
/// that do not fit [`RegistryEntry`] are dropped with a warning.
pub fn parse_listing(text: &str, origin: &str) -> Result<Vec<RegistryEntry>, CatalogError> {
    let values: Vec<Value> =
        serde_json::from_str(text).map_err(|source| CatalogError::RegistryParse {
            origin: origin.to_string(),
            source,
        })?;

    let mut entries = Vec::with_capacity(values.len());
    for (position, value) in values.into_iter().enumerate() {
        let label = value
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{position}"));
        match serde_json::from_value::<RegistryEntry>(value) {
            Ok(entry) => entries.push(entry),
            Err(err) => warn!("{origin}: skipping malformed registry entry {label}: {err}"),
        }
    }
    Ok(entries)
}

/// Anything that can produce the full registry listing.
pub trait RegistrySource {
    fn list_datasets(&self) -> Result<Vec<RegistryEntry>, CatalogError>;
}

impl RegistrySource for Vec<RegistryEntry> {
    fn list_datasets(&self) -> Result<Vec<RegistryEntry>, CatalogError> {
        Ok(self.clone())
    }
}

/// Saved listing on disk: a JSON array of entries, as written by `hubcatalog fetch`.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    path: PathBuf,
}

impl FileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RegistrySource for FileRegistry {
    fn list_datasets(&self) -> Result<Vec<RegistryEntry>, CatalogError> {
        let raw = fs::read_to_string(&self.path).map_err(|err| CatalogError::io(&self.path, err))?;
        parse_listing(&raw, &self.path.display().to_string())
    }
}

/// The saved listing when one is configured, the hub otherwise.
pub fn source_for(config: &ExportConfig) -> Result<Box<dyn RegistrySource>, CatalogError> {
    match &config.registry_file {
        Some(path) => Ok(Box::new(FileRegistry::new(path))),
        None => Ok(Box::new(HubClient::from_config(config)?)),
    }
}

/// Write a listing so it can be reloaded with [`FileRegistry`].
pub fn save_listing(path: &Path, entries: &[RegistryEntry]) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| CatalogError::io(parent, err))?;
    }
    let payload = serde_json::to_string_pretty(entries).map_err(|source| CatalogError::RegistryParse {
        origin: path.display().to_string(),
        source,
    })?;
    fs::write(path, payload).map_err(|err| CatalogError::io(path, err))
}

/// Listing keyed by dataset id. A repeated id replaces the earlier entry.
#[derive(Debug, Clone, Default)]
pub struct RegistryIndex {
    entries: HashMap<String, RegistryEntry>,
}

impl RegistryIndex {
    pub fn from_entries(entries: impl IntoIterator<Item = RegistryEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.id.clone(), entry))
            .collect();
        Self { entries }
    }

    pub fn load(source: &dyn RegistrySource) -> Result<Self, CatalogError> {
        Ok(Self::from_entries(source.list_datasets()?))
    }

    pub fn get(&self, key: &str) -> Option<&RegistryEntry> {
        self.entries.get(key)
    }

    pub fn require(&self, key: &str) -> Result<&RegistryEntry, CatalogError> {
        self.get(key).ok_or_else(|| CatalogError::UnknownDataset {
            key: key.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
