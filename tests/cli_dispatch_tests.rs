use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_hubcatalog")
}

const REGISTRY: &str = r#"[
    {
        "id": "foo",
        "author": "A. Smith",
        "citation": "title{My Dataset}",
        "tags": ["task:x", "licenses:mit"],
        "lastModified": "2022-01-25T16:10:12.000Z",
        "private": false
    }
]"#;

fn write_fixture(workdir: &Path, keys: &[&str]) {
    for key in keys {
        let dir = workdir.join("src").join("datasets").join(key);
        fs::create_dir_all(&dir).expect("dataset dir should be created");
        fs::write(
            dir.join("dataset_infos.json"),
            r#"{"a": {"dataset_size": 100}, "b": {"dataset_size": 50}}"#,
        )
        .expect("sidecar should be written");
    }
    fs::write(workdir.join("registry.json"), REGISTRY).expect("registry should be written");
}

fn run(workdir: &Path, args: &[&str]) -> Output {
    Command::new(bin())
        .current_dir(workdir)
        .args(args)
        .env_remove("HUBCATALOG_ROOT")
        .env_remove("HUBCATALOG_OUTPUT")
        .env_remove("HUBCATALOG_ENDPOINT")
        .env_remove("HUBCATALOG_MISSING")
        .env("HUBCATALOG_REGISTRY_FILE", "registry.json")
        .output()
        .expect("hubcatalog should run")
}

#[test]
fn no_arguments_exports_with_default_paths() {
    let workdir = tempfile::tempdir().unwrap();
    write_fixture(workdir.path(), &["foo"]);

    let output = run(workdir.path(), &[]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("export complete: rows=1, skipped=0"));

    let csv = fs::read_to_string(workdir.path().join("dataset.csv")).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("id,ref,subtitle,creatorName"));
    assert_eq!(
        lines.next(),
        Some(",foo,,A. Smith,,150,https://huggingface.co/datasets/foo,2022-01-25T16:10:12.000Z,,False,,mit,,A. Smith,,,My Dataset,,")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn export_flags_pick_root_and_output() {
    let workdir = tempfile::tempdir().unwrap();
    write_fixture(workdir.path(), &["foo"]);

    let output = run(
        workdir.path(),
        &[
            "export",
            "--root",
            "src/datasets",
            "--output",
            "reports/catalog.csv",
            "--registry-file",
            "registry.json",
        ],
    );
    assert_eq!(output.status.code(), Some(0));
    assert!(workdir.path().join("reports").join("catalog.csv").is_file());
    assert!(!workdir.path().join("dataset.csv").exists());
}

#[test]
fn unknown_dataset_fails_the_export() {
    let workdir = tempfile::tempdir().unwrap();
    write_fixture(workdir.path(), &["foo", "not_on_hub"]);

    let output = run(workdir.path(), &["export"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("export failed: dataset 'not_on_hub' has no registry entry"));
    assert!(!workdir.path().join("dataset.csv").exists());
}

#[test]
fn skip_missing_keeps_known_datasets() {
    let workdir = tempfile::tempdir().unwrap();
    write_fixture(workdir.path(), &["foo", "not_on_hub"]);

    let output = run(workdir.path(), &["export", "--skip-missing"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("export complete: rows=1, skipped=1"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("skipped 'not_on_hub'"));
}

#[test]
fn scan_lists_sizes() {
    let workdir = tempfile::tempdir().unwrap();
    write_fixture(workdir.path(), &["foo"]);

    let output = run(workdir.path(), &["scan"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "foo\t2\t150\n");
}

#[test]
fn missing_root_fails_scan() {
    let workdir = tempfile::tempdir().unwrap();

    let output = run(workdir.path(), &["scan", "--root", "nowhere"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("dataset root not found"));
}

#[test]
fn unknown_command_returns_usage() {
    let workdir = tempfile::tempdir().unwrap();

    let output = run(workdir.path(), &["publish"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}
