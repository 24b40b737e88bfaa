//! Field extraction from registry entries and local sidecars.

pub mod citation;
pub mod license;
pub mod sidecar;

pub use citation::{scrape_creator, scrape_field, scrape_title};
pub use license::{resolve_license, UNKNOWN_LICENSE};
pub use sidecar::{load_sidecar, parse_sidecar, Sidecar, SIDECAR_FILE_NAME};
