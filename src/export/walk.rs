//! Dataset discovery: the immediate child directories of the dataset root that hold a sidecar.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::CatalogError;
use crate::extract::SIDECAR_FILE_NAME;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDir {
    /// Registry lookup key: the directory path relative to the dataset root.
    pub key: String,
    pub dir: PathBuf,
    pub sidecar: PathBuf,
}

/// Registry key for `dir`, or None when it is outside `root` or not valid UTF-8.
pub fn lookup_key(root: &Path, dir: &Path) -> Option<String> {
    let relative = dir.strip_prefix(root).ok()?;
    let key = relative.to_str()?;
    (!key.is_empty()).then(|| key.to_string())
}

/// Non-recursive: files directly under `root` and nested directories are not visited.
/// Sorted by key.
pub fn discover_datasets(root: &Path) -> Result<Vec<DatasetDir>, CatalogError> {
    if !root.is_dir() {
        return Err(CatalogError::MissingRoot {
            path: root.to_path_buf(),
        });
    }

    let mut found = Vec::new();
    for entry in fs::read_dir(root).map_err(|err| CatalogError::io(root, err))? {
        let entry = entry.map_err(|err| CatalogError::io(root, err))?;
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let sidecar = dir.join(SIDECAR_FILE_NAME);
        if !sidecar.is_file() {
            debug!("no {SIDECAR_FILE_NAME} in {}", dir.display());
            continue;
        }
        let Some(key) = lookup_key(root, &dir) else {
            warn!("skipping {}: directory name is not valid UTF-8", dir.display());
            continue;
        };
        found.push(DatasetDir { key, dir, sidecar });
    }

    found.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch_sidecar(root: &Path, name: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SIDECAR_FILE_NAME), "{}").unwrap();
    }

    #[test]
    fn finds_first_level_sidecars_sorted() {
        let root = tempfile::tempdir().unwrap();
        touch_sidecar(root.path(), "squad");
        touch_sidecar(root.path(), "glue");
        fs::create_dir_all(root.path().join("empty_dir")).unwrap();

        let found = discover_datasets(root.path()).unwrap();
        let keys: Vec<_> = found.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["glue", "squad"]);
        assert_eq!(found[0].sidecar, root.path().join("glue").join(SIDECAR_FILE_NAME));
    }

    #[test]
    fn ignores_root_level_files_and_nested_directories() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join(SIDECAR_FILE_NAME), "{}").unwrap();
        touch_sidecar(&root.path().join("outer"), "inner");

        assert!(discover_datasets(root.path()).unwrap().is_empty());
    }

    #[test]
    fn sidecar_must_be_a_file() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("odd").join(SIDECAR_FILE_NAME)).unwrap();
        assert!(discover_datasets(root.path()).unwrap().is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_directory_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = tempfile::tempdir().unwrap();
        touch_sidecar(root.path(), "ok");
        let bad = root.path().join(OsStr::from_bytes(b"bad\xff"));
        fs::create_dir_all(&bad).unwrap();
        fs::write(bad.join(SIDECAR_FILE_NAME), "{}").unwrap();

        let found = discover_datasets(root.path()).unwrap();
        let keys: Vec<_> = found.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["ok"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let err = discover_datasets(&root.path().join("absent")).unwrap_err();
        assert!(matches!(err, CatalogError::MissingRoot { .. }));
    }

    #[test]
    fn lookup_key_strips_root_prefix() {
        let root = Path::new("src/datasets");
        assert_eq!(lookup_key(root, Path::new("src/datasets/foo")).as_deref(), Some("foo"));
        assert_eq!(lookup_key(root, Path::new("elsewhere/foo")), None);
        assert_eq!(lookup_key(root, root), None);
    }
}
