//! Run configuration: built-in defaults, then `HUBCATALOG_*` environment overrides,
//! then command-line flags (applied by `cli`).

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use log::warn;

use crate::error::CatalogError;

pub const DEFAULT_DATASET_ROOT: &str = "src/datasets";
pub const DEFAULT_OUTPUT_PATH: &str = "dataset.csv";
pub const DEFAULT_ENDPOINT: &str = "https://huggingface.co/api/datasets";
pub const DEFAULT_PAGE_SIZE: usize = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const ENV_ROOT: &str = "HUBCATALOG_ROOT";
pub const ENV_OUTPUT: &str = "HUBCATALOG_OUTPUT";
pub const ENV_ENDPOINT: &str = "HUBCATALOG_ENDPOINT";
pub const ENV_REGISTRY_FILE: &str = "HUBCATALOG_REGISTRY_FILE";
pub const ENV_MISSING: &str = "HUBCATALOG_MISSING";
pub const ENV_PAGE_SIZE: &str = "HUBCATALOG_PAGE_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "HUBCATALOG_TIMEOUT_SECS";
pub const ENV_TOKEN: &str = "HF_TOKEN";

/// What to do with a dataset directory that has no registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Abort the run.
    #[default]
    Fail,
    /// Warn, leave the dataset out of the CSV, keep going.
    Skip,
}

impl MissingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MissingPolicy {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "skip" => Ok(Self::Skip),
            other => Err(CatalogError::InvalidConfig(format!(
                "missing-dataset policy must be 'fail' or 'skip', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub dataset_root: PathBuf,
    pub output: PathBuf,
    pub endpoint: String,
    /// Saved listing to use instead of the network.
    pub registry_file: Option<PathBuf>,
    pub token: Option<String>,
    pub page_size: usize,
    pub timeout_secs: u64,
    pub missing: MissingPolicy,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dataset_root: PathBuf::from(DEFAULT_DATASET_ROOT),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            registry_file: None,
            token: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            missing: MissingPolicy::Fail,
        }
    }
}

impl ExportConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns. Empty values count as unset;
    /// unparsable values are reported and the default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(root) = get(ENV_ROOT) {
            config.dataset_root = PathBuf::from(root);
        }
        if let Some(output) = get(ENV_OUTPUT) {
            config.output = PathBuf::from(output);
        }
        if let Some(endpoint) = get(ENV_ENDPOINT) {
            config.endpoint = endpoint;
        }
        config.registry_file = get(ENV_REGISTRY_FILE).map(PathBuf::from);
        config.token = get(ENV_TOKEN);
        config.page_size = parse_or_default(get(ENV_PAGE_SIZE), ENV_PAGE_SIZE, DEFAULT_PAGE_SIZE);
        config.timeout_secs =
            parse_or_default(get(ENV_TIMEOUT_SECS), ENV_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS);
        if let Some(raw) = get(ENV_MISSING) {
            match raw.parse() {
                Ok(policy) => config.missing = policy,
                Err(err) => warn!("{ENV_MISSING}: {err}, defaulting to {}", config.missing),
            }
        }

        config
    }
}

fn parse_or_default<T>(raw: Option<String>, name: &str, default: T) -> T
where
    T: FromStr + fmt::Display + Copy,
{
    raw.map(|value| {
        value.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("invalid {name} '{value}', defaulting to {default}");
            default
        })
    })
    .unwrap_or(default)
}
