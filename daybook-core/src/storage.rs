//! Key-value storage backends for the persisted mapping.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("storage rejected write for key '{0}'")]
    Rejected(String),
}

/// Minimal blob store the task store persists through.
pub trait Storage {
    /// `Ok(None)` when nothing has been stored under `key` yet.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage. Contents die with the value.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(s) if s.trim().is_empty() => Ok(None),
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Write {
            path: self.dir.clone(),
            source,
        })?;

        if path.exists() {
            let backup = path.with_extension("json.bak");
            if let Err(e) = fs::copy(&path, &backup) {
                warn!("failed to create backup {}: {}", backup.display(), e);
            }
        }

        fs::write(&path, value).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(bytes = value.len(), "wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_storage_roundtrip() {
        let mut s = MemoryStorage::new();
        assert_eq!(s.read("k").unwrap(), None);
        s.write("k", "v").unwrap();
        assert_eq!(s.read("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn file_storage_missing_file_reads_none() {
        let temp = tempdir().unwrap();
        let s = FileStorage::new(temp.path().join("nested"));
        assert_eq!(s.read("dailyTasks.v1").unwrap(), None);
    }

    #[test]
    fn file_storage_creates_dir_and_keeps_backup() {
        let temp = tempdir().unwrap();
        let mut s = FileStorage::new(temp.path().join("data"));
        s.write("k", "first").unwrap();
        s.write("k", "second").unwrap();

        assert_eq!(s.read("k").unwrap().as_deref(), Some("second"));
        let backup = s.path_for("k").with_extension("json.bak");
        assert_eq!(fs::read_to_string(backup).unwrap(), "first");
    }

    #[test]
    fn file_storage_blank_file_reads_none() {
        let temp = tempdir().unwrap();
        let s = FileStorage::new(temp.path());
        fs::write(s.path_for("k"), "  \n").unwrap();
        assert_eq!(s.read("k").unwrap(), None);
    }
}
