use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{ExportConfig, MissingPolicy};
use crate::error::CatalogError;
use crate::export::{run_export, scan};
use crate::registry::{save_listing, source_for, HubClient, RegistrySource};

pub const DEFAULT_LISTING_PATH: &str = "registry.json";

#[derive(Debug, Parser)]
#[command(
    name = "hubcatalog",
    about = "Flatten cached hub dataset metadata into a CSV catalog"
)]
pub struct Cli {
    /// Defaults to `export` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Join local dataset_infos.json sidecars with the registry and write the CSV.
    Export(ExportArgs),
    /// List discovered datasets and their sizes without touching the registry.
    Scan {
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Download the registry listing for later `export --registry-file` runs.
    Fetch {
        #[arg(long, default_value = DEFAULT_LISTING_PATH)]
        output: PathBuf,
        #[arg(long)]
        endpoint: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct ExportArgs {
    #[arg(long)]
    pub root: Option<PathBuf>,
    #[arg(long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub registry_file: Option<PathBuf>,
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Leave out datasets the registry does not know instead of aborting.
    #[arg(long)]
    pub skip_missing: bool,
}

impl ExportArgs {
    pub fn apply(&self, config: &mut ExportConfig) {
        if let Some(root) = &self.root {
            config.dataset_root = root.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(registry_file) = &self.registry_file {
            config.registry_file = Some(registry_file.clone());
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if self.skip_missing {
            config.missing = MissingPolicy::Skip;
        }
    }
}

pub fn parse_command(args: &[String]) -> Result<Command, clap::Error> {
    let cli = Cli::try_parse_from(args)?;
    Ok(cli
        .command
        .unwrap_or_else(|| Command::Export(ExportArgs::default())))
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Ok(command) => run_command(command, ExportConfig::from_env()),
        Err(err) => {
            let _ = err.print();
            err.exit_code()
        }
    }
}

/// Runs `command` on top of `base` (defaults + environment). Returns the exit code.
pub fn run_command(command: Command, base: ExportConfig) -> i32 {
    match command {
        Command::Export(args) => handle_export(&args, base),
        Command::Scan { root } => handle_scan(root, base),
        Command::Fetch { output, endpoint } => handle_fetch(output, endpoint, base),
    }
}

fn handle_export(args: &ExportArgs, mut config: ExportConfig) -> i32 {
    args.apply(&mut config);

    let result = source_for(&config).and_then(|source| run_export(&config, source.as_ref()));
    match result {
        Ok(report) => {
            println!(
                "export complete: rows={}, skipped={}, output='{}'",
                report.rows_written,
                report.skipped.len(),
                report.output_path.display()
            );
            for key in &report.skipped {
                eprintln!("- skipped '{key}': no registry entry");
            }
            0
        }
        Err(err) => {
            eprintln!("export failed: {err}");
            if matches!(err, CatalogError::UnknownDataset { .. }) {
                eprintln!("rerun with --skip-missing to leave such datasets out");
            }
            1
        }
    }
}

fn handle_scan(root: Option<PathBuf>, config: ExportConfig) -> i32 {
    let root = root.unwrap_or(config.dataset_root);
    match scan(&root) {
        Ok(entries) => {
            if entries.is_empty() {
                eprintln!("no datasets found under {}", root.display());
            }
            for entry in entries {
                println!("{}\t{}\t{}", entry.key, entry.subsets, entry.total_bytes);
            }
            0
        }
        Err(err) => {
            eprintln!("scan failed: {err}");
            1
        }
    }
}

fn handle_fetch(output: PathBuf, endpoint: Option<String>, mut config: ExportConfig) -> i32 {
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
    }

    let result = HubClient::from_config(&config)
        .and_then(|hub| hub.list_datasets())
        .and_then(|entries| save_listing(&output, &entries).map(|()| entries.len()));
    match result {
        Ok(count) => {
            println!("fetch complete: entries={count}, output='{}'", output.display());
            0
        }
        Err(err) => {
            eprintln!("fetch failed: {err}");
            1
        }
    }
}
