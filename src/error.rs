use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset root not found: {}", path.display())]
    MissingRoot { path: PathBuf },

    #[error("failed to parse sidecar {}: {source}", path.display())]
    Sidecar {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse registry listing from {origin}: {source}")]
    RegistryParse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("registry request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("registry request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("dataset '{key}' has no registry entry")]
    UnknownDataset { key: String },

    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
