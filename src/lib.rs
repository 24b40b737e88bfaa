pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod registry;

pub use config::{ExportConfig, MissingPolicy};
pub use error::CatalogError;
