//! `dataset_infos.json` sidecar: one descriptor per subset (config), each declaring its size.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::CatalogError;

pub const SIDECAR_FILE_NAME: &str = "dataset_infos.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubsetInfo {
    pub dataset_size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Sidecar {
    subsets: BTreeMap<String, SubsetInfo>,
}

impl Sidecar {
    pub fn total_bytes(&self) -> u64 {
        self.subsets
            .values()
            .fold(0u64, |acc, subset| acc.saturating_add(subset.dataset_size))
    }

    pub fn subset_count(&self) -> usize {
        self.subsets.len()
    }

    pub fn subset_names(&self) -> impl Iterator<Item = &str> {
        self.subsets.keys().map(String::as_str)
    }
}

/// Parse sidecar text. `origin` only labels the error.
pub fn parse_sidecar(text: &str, origin: &Path) -> Result<Sidecar, CatalogError> {
    serde_json::from_str(text).map_err(|source| CatalogError::Sidecar {
        path: origin.to_path_buf(),
        source,
    })
}

pub fn load_sidecar(path: &Path) -> Result<Sidecar, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|err| CatalogError::io(path, err))?;
    parse_sidecar(&raw, path)
}
