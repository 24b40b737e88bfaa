//! Catalog export: registry index + dataset walk + sidecar sizes -> one CSV row per dataset.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::{ExportConfig, MissingPolicy};
use crate::error::CatalogError;
use crate::extract::load_sidecar;
use crate::registry::{RegistryIndex, RegistrySource};

pub mod row;
pub mod walk;

pub use row::{DatasetRow, COLUMNS, DATASET_URL_PREFIX};
pub use walk::{discover_datasets, lookup_key, DatasetDir};

#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub output_path: PathBuf,
    pub registry_entries: usize,
    pub rows_written: usize,
    /// Keys left out under [`MissingPolicy::Skip`].
    pub skipped: Vec<String>,
}

/// Rows plus the keys skipped for lack of a registry entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogRows {
    pub rows: Vec<DatasetRow>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub key: String,
    pub subsets: usize,
    pub total_bytes: u64,
}

pub fn build_rows(
    root: &Path,
    index: &RegistryIndex,
    missing: MissingPolicy,
) -> Result<CatalogRows, CatalogError> {
    let mut out = CatalogRows::default();

    for dataset in discover_datasets(root)? {
        let entry = match (index.require(&dataset.key), missing) {
            (Ok(entry), _) => entry,
            (Err(err), MissingPolicy::Fail) => return Err(err),
            (Err(err), MissingPolicy::Skip) => {
                warn!("{err}; skipping {}", dataset.dir.display());
                out.skipped.push(dataset.key);
                continue;
            }
        };

        let sidecar = load_sidecar(&dataset.sidecar)?;
        debug!(
            "{}: {} subsets, {} bytes",
            dataset.key,
            sidecar.subset_count(),
            sidecar.total_bytes()
        );
        out.rows
            .push(DatasetRow::assemble(&dataset.key, entry, sidecar.total_bytes()));
    }

    Ok(out)
}

/// Truncates `path`; the header is written even when `rows` is empty.
pub fn write_rows(path: &Path, rows: &[DatasetRow]) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| CatalogError::io(parent, err))?;
    }
    let file = File::create(path).map_err(|err| CatalogError::io(path, err))?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|err| CatalogError::io(path, err))
}

/// Whole pipeline. Nothing is written when any dataset fails.
pub fn run_export(
    config: &ExportConfig,
    source: &dyn RegistrySource,
) -> Result<ExportReport, CatalogError> {
    let index = RegistryIndex::load(source)?;
    info!("registry index holds {} datasets", index.len());

    let CatalogRows { rows, skipped } = build_rows(&config.dataset_root, &index, config.missing)?;
    write_rows(&config.output, &rows)?;
    info!("wrote {} rows to {}", rows.len(), config.output.display());

    Ok(ExportReport {
        output_path: config.output.clone(),
        registry_entries: index.len(),
        rows_written: rows.len(),
        skipped,
    })
}

/// Offline listing of what an export would read; no registry access.
pub fn scan(root: &Path) -> Result<Vec<ScanEntry>, CatalogError> {
    discover_datasets(root)?
        .into_iter()
        .map(|dataset| {
            let sidecar = load_sidecar(&dataset.sidecar)?;
            Ok(ScanEntry {
                subsets: sidecar.subset_count(),
                total_bytes: sidecar.total_bytes(),
                key: dataset.key,
            })
        })
        .collect()
}
