//! JSON file access shared by the config store and the record repairer

use crate::error::StorageError;
use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read and parse a JSON document, keeping "missing", "malformed" and
/// "unreadable" apart.
pub fn read_json(path: &Path) -> Result<Value, StorageError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            StorageError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            StorageError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&content).map_err(|source| StorageError::MalformedJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` as indented JSON and atomically replace `dest` with it
pub fn write_json_atomic(dest: &Path, value: &Value) -> io::Result<()> {
    let content = serde_json::to_vec_pretty(value)?;
    write_atomic(dest, &content)
}

/// Atomically replace `dest` with `contents`.
///
/// The bytes go to a temporary file in the same directory as `dest`, which
/// is then renamed over it. Readers see either the old file or the new one.
/// On failure the temporary file is removed and `dest` is left untouched.
pub fn write_atomic(dest: &Path, contents: &[u8]) -> io::Result<()> {
    write_atomic_with(dest, contents, |_| Ok(()))
}

/// `write_atomic` with a hook that runs after the temporary file is fully
/// written and synced, right before the rename.
pub(crate) fn write_atomic_with<F>(dest: &Path, contents: &[u8], before_commit: F) -> io::Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = dest
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document");

    // Dropping the handle on any early return deletes the temp file
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{}.", file_name))
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;

    before_commit(tmp.path())?;

    tmp.persist(dest).map_err(|err| err.error)?;
    debug!("💾 Atomically wrote {} bytes to {}", contents.len(), dest.display());
    Ok(())
}

/// `<original-name>.backup` next to `path`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".backup");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;
    use serde_json::json;
    use tempfile::TempDir;

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_atomic_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.json");
        fs::write(&path, b"old").unwrap();

        write_atomic(&path, b"new contents").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new contents");
        assert_eq!(dir_entries(temp_dir.path()), vec!["doc.json"]);
    }

    #[test]
    fn test_interrupted_write_leaves_destination_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        let store = ConfigStore::new(&path);
        assert!(store.save(&store.load()));
        let before = fs::read(&path).unwrap();

        let mut seen_tmp = None;
        let result = write_atomic_with(&path, b"{\"general\": {}}", |tmp| {
            seen_tmp = Some(tmp.to_path_buf());
            assert_eq!(fs::read(tmp).unwrap(), b"{\"general\": {}}");
            Err(io::Error::new(io::ErrorKind::Interrupted, "simulated crash"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read(&path).unwrap(), before);
        assert!(!seen_tmp.unwrap().exists());
        assert_eq!(dir_entries(temp_dir.path()), vec!["config.json"]);
    }

    #[test]
    fn test_write_into_missing_directory_fails_cleanly() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope").join("doc.json");

        assert!(write_atomic(&path, b"{}").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_read_json_distinguishes_failures() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        let broken = temp_dir.path().join("broken.json");
        let good = temp_dir.path().join("good.json");
        fs::write(&broken, "{ not json").unwrap();
        fs::write(&good, r#"{"video_id": "42"}"#).unwrap();

        assert!(matches!(
            read_json(&missing),
            Err(StorageError::NotFound { .. })
        ));
        assert!(matches!(
            read_json(&broken),
            Err(StorageError::MalformedJson { .. })
        ));
        assert!(matches!(
            read_json(temp_dir.path()),
            Err(StorageError::Read { .. })
        ));
        assert_eq!(read_json(&good).unwrap(), json!({"video_id": "42"}));
    }

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("out/video_1.json")),
            PathBuf::from("out/video_1.json.backup")
        );
    }
}
