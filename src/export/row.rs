//! Flattened CSV row. Most columns have no source data and stay blank.

use serde::{Serialize, Serializer};

use crate::extract::{resolve_license, scrape_creator, scrape_title};
use crate::registry::RegistryEntry;

pub const DATASET_URL_PREFIX: &str = "https://huggingface.co/datasets/";

pub const COLUMNS: [&str; 19] = [
    "id",
    "ref",
    "subtitle",
    "creatorName",
    "creatorUrl",
    "totalBytes",
    "url",
    "lastUpdated",
    "downloadCount",
    "isPrivate",
    "isFeatured",
    "licenseName",
    "description",
    "ownerName",
    "ownerRef",
    "kernelCount",
    "title",
    "currentVersionNumber",
    "usabilityRating",
];

/// Field order must match [`COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetRow {
    pub id: Option<String>,
    #[serde(rename = "ref")]
    pub reference: String,
    pub subtitle: Option<String>,
    pub creator_name: String,
    pub creator_url: Option<String>,
    pub total_bytes: u64,
    pub url: String,
    pub last_updated: Option<String>,
    pub download_count: Option<u64>,
    #[serde(serialize_with = "capitalized_bool")]
    pub is_private: bool,
    pub is_featured: Option<bool>,
    pub license_name: String,
    pub description: Option<String>,
    pub owner_name: String,
    pub owner_ref: Option<String>,
    pub kernel_count: Option<u64>,
    pub title: String,
    pub current_version_number: Option<u32>,
    pub usability_rating: Option<f64>,
}

impl DatasetRow {
    pub fn assemble(key: &str, entry: &RegistryEntry, total_bytes: u64) -> Self {
        let creator_name = scrape_creator(entry);
        let creator_url: Option<String> = None;
        Self {
            reference: key.to_string(),
            owner_name: creator_name.clone(),
            owner_ref: creator_url.clone(),
            creator_name,
            creator_url,
            total_bytes,
            url: format!("{DATASET_URL_PREFIX}{key}"),
            last_updated: entry.last_modified.clone(),
            is_private: entry.is_private(),
            license_name: resolve_license(&entry.tags),
            title: scrape_title(entry.citation.as_deref()),
            ..Self::default()
        }
    }
}

// Existing catalog files spell flags `True`/`False`.
fn capitalized_bool<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "True" } else { "False" })
}
