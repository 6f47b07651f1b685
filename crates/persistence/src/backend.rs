//! Storage backends for persisted stores.
//!
//! A backend maps a store key to an opaque blob. It knows nothing about
//! the value inside; [`crate::Store`] handles serialization.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Key/blob storage used by [`crate::Store`].
pub trait StoreBackend: Send + Sync {
    /// Reads the blob for `key`; `None` when nothing was saved yet.
    fn load(&self, key: &str) -> io::Result<Option<Vec<u8>>>;

    /// Replaces the blob for `key`.
    fn save(&self, key: &str, bytes: &[u8]) -> io::Result<()>;

    /// Deletes the blob for `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Opens (and creates if needed) the store directory.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StoreBackend for FileBackend {
    fn load(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        // Each write stages into its own file beside the target, then renames
        // over it. Readers never see a half file.
        let mut staging = tempfile::Builder::new()
            .prefix(&format!(".{}.", key))
            .suffix(".tmp")
            .tempfile_in(&self.dir)?;
        staging.write_all(bytes)?;
        staging.persist(self.path_for(key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Process-local backend; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn blobs(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.blobs
            .lock()
            .map_err(|_| io::Error::other("memory store lock poisoned"))
    }
}

impl StoreBackend for MemoryBackend {
    fn load(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.blobs()?.get(key).cloned())
    }

    fn save(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        self.blobs()?.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.blobs()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_backend_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("nested")).unwrap();

        assert_eq!(backend.load("token").unwrap(), None);
        backend.save("token", b"{}").unwrap();
        assert_eq!(backend.load("token").unwrap(), Some(b"{}".to_vec()));
        assert!(backend.dir().join("token.json").exists());
        let staged: Vec<_> = fs::read_dir(backend.dir())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(staged.is_empty());

        backend.remove("token").unwrap();
        backend.remove("token").unwrap();
        assert_eq!(backend.load("token").unwrap(), None);
    }

    #[test]
    fn test_file_backend_parallel_saves() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();

        std::thread::scope(|scope| {
            for writer in 0..8 {
                let backend = backend.clone();
                scope.spawn(move || {
                    for i in 0..50 {
                        let body = format!("{{\"w\":{},\"i\":{}}}", writer, i);
                        backend.save("token", body.as_bytes()).unwrap();
                    }
                });
            }
        });

        let saved = backend.load("token").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&saved).unwrap();
        assert_eq!(value["i"], 49);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_memory_backend_is_shared_between_clones() {
        let backend = MemoryBackend::new();
        let clone = backend.clone();
        backend.save("k", b"1").unwrap();
        assert_eq!(clone.load("k").unwrap(), Some(b"1".to_vec()));
    }
}
