//! Key-value persistence backends
//!
//! The session is stored as a flat mapping of string keys to string values.
//! [`MemoryBackend`] keeps it in process memory; [`FileBackend`] writes
//! through to a JSON file so a remembered session survives restarts.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::StoreError;

/// Abstraction over session persistence
pub trait SessionBackend: Send {
    /// Read a value by key
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a single key if present
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Remove every stored key
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// In-memory backend used for tests and non-remembered sessions
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }
}

/// JSON-file backend with write-through persistence
///
/// The whole mapping is rewritten on every mutation. Session payloads are a
/// handful of short strings, so this stays cheap.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileBackend {
    /// Open a backend at `path`, loading any existing session file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            HashMap::new()
        };
        Ok(Self { path, entries })
    }

    /// Default session file location under the platform data directory
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| {
                StoreError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    "Could not find data directory",
                ))
            })?;
        Ok(base.join("FleetSync").join("session.json"))
    }

    /// The file this backend persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SessionBackend for FileBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if self.entries.is_empty() {
            return Ok(());
        }
        self.entries.clear();
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn memory_backend_set_get_clear() {
        let mut backend = MemoryBackend::new();
        backend.set("driver_id", "DRV-245").expect("set");
        assert_eq!(backend.get("driver_id"), Some("DRV-245".to_string()));

        backend.clear().expect("clear");
        assert_eq!(backend.get("driver_id"), None);
    }

    #[test]
    fn file_backend_survives_reopen() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("session.json");

        let mut backend = FileBackend::open(&path).expect("open");
        backend.set("driver_id", "DRV-245").expect("set");
        backend.set("logged_in", "true").expect("set");
        drop(backend);

        let reopened = FileBackend::open(&path).expect("reopen");
        assert_eq!(reopened.get("driver_id"), Some("DRV-245".to_string()));
        assert_eq!(reopened.get("logged_in"), Some("true".to_string()));
    }

    #[test]
    fn file_backend_clear_empties_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("session.json");

        let mut backend = FileBackend::open(&path).expect("open");
        backend.set("remember_me", "true").expect("set");
        backend.clear().expect("clear");

        let reopened = FileBackend::open(&path).expect("reopen");
        assert_eq!(reopened.get("remember_me"), None);
    }

    #[test]
    fn missing_parent_dirs_are_created() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("deeper").join("session.json");

        let mut backend = FileBackend::open(&path).expect("open");
        backend.set("driver_id", "DRV-108").expect("set");
        assert!(path.exists());
    }
}
