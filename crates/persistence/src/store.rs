//! Generic persisted, observable store.
//!
//! A store holds one value of type `T`. Every write replaces the whole
//! value, persists it through the backend and notifies subscribers. The
//! last writer wins. Opening a store reads the persisted value back; a
//! value that can no longer be decoded is discarded and the store starts
//! from `T::default()`.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::backend::StoreBackend;
use crate::metrics::{record_store_recovery, StoreTimer};

/// Format version written next to every persisted value.
const STORE_VERSION: u32 = 0;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store value could not be encoded: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct PersistedRef<'a, T> {
    state: &'a T,
    version: u32,
}

#[derive(Deserialize)]
struct Persisted<T> {
    state: T,
}

struct Inner<T> {
    key: String,
    backend: Arc<dyn StoreBackend>,
    tx: watch::Sender<T>,
    // Held across the backend write and the in-memory swap.
    write: Mutex<()>,
}

/// Observable value persisted under one key. Clones share the same value.
pub struct Store<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("key", &self.inner.key).finish()
    }
}

impl<T> Store<T>
where
    T: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Opens the store, restoring the persisted value if there is one.
    pub fn open(key: impl Into<String>, backend: Arc<dyn StoreBackend>) -> Result<Self, StoreError> {
        let key = key.into();

        let timer = StoreTimer::new(key.clone(), "load");
        let loaded = backend.load(&key);
        timer.record();

        let initial = match loaded? {
            None => T::default(),
            Some(bytes) => match serde_json::from_slice::<Persisted<T>>(&bytes) {
                Ok(persisted) => persisted.state,
                Err(e) => {
                    warn!(store = %key, error = %e, "Discarding unreadable stored value");
                    record_store_recovery(&key);
                    T::default()
                }
            },
        };

        debug!(store = %key, "Store opened");
        let (tx, _) = watch::channel(initial);
        Ok(Self {
            inner: Arc::new(Inner {
                key,
                backend,
                tx,
                write: Mutex::new(()),
            }),
        })
    }

    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.inner.tx.borrow().clone()
    }

    /// Replaces the value, persisting it before subscribers see it.
    pub fn set(&self, value: T) -> Result<(), StoreError> {
        let _guard = self.lock_writes();
        self.persist(&value)?;
        self.inner.tx.send_replace(value);
        Ok(())
    }

    /// Applies `f` to a copy of the current value and stores the result.
    /// No other write lands between the read and the write.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> Result<(), StoreError> {
        let _guard = self.lock_writes();
        let mut value = self.get();
        f(&mut value);
        self.persist(&value)?;
        self.inner.tx.send_replace(value);
        Ok(())
    }

    /// Resets to the default value and forgets the persisted copy.
    pub fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock_writes();
        let timer = StoreTimer::new(self.inner.key.clone(), "remove");
        let removed = self.inner.backend.remove(&self.inner.key);
        timer.record();
        removed?;

        self.inner.tx.send_replace(T::default());
        Ok(())
    }

    /// Receiver that observes every later write.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.inner.tx.subscribe()
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        // The guard protects no data, so a poisoned lock is still usable.
        self.inner
            .write
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(&PersistedRef {
            state: value,
            version: STORE_VERSION,
        })?;

        let timer = StoreTimer::new(self.inner.key.clone(), "save");
        let saved = self.inner.backend.save(&self.inner.key, &bytes);
        timer.record();
        Ok(saved?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{FileBackend, MemoryBackend};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        keyword: String,
        top_n: usize,
    }

    fn file_store(dir: &std::path::Path) -> Store<Prefs> {
        let backend = Arc::new(FileBackend::new(dir).unwrap());
        Store::open("prefs", backend).unwrap()
    }

    #[test]
    fn test_value_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Prefs {
            keyword: "Lathe".into(),
            top_n: 3,
        };

        file_store(dir.path()).set(prefs.clone()).unwrap();
        assert_eq!(file_store(dir.path()).get(), prefs);
    }

    #[test]
    fn test_corrupted_file_opens_as_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("prefs.json"), b"{not json").unwrap();

        let store = file_store(dir.path());
        assert_eq!(store.get(), Prefs::default());

        store.update(|p| p.top_n = 2).unwrap();
        assert_eq!(file_store(dir.path()).get().top_n, 2);
    }

    #[test]
    fn test_persisted_layout() {
        let dir = tempfile::tempdir().unwrap();
        file_store(dir.path())
            .set(Prefs {
                keyword: "k".into(),
                top_n: 1,
            })
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("prefs.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["state"]["keyword"], "k");
        assert_eq!(value["version"], 0);
    }

    #[test]
    fn test_clear_resets_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(dir.path());
        store.update(|p| p.keyword = "x".into()).unwrap();

        store.clear().unwrap();
        assert_eq!(store.get(), Prefs::default());
        assert!(!dir.path().join("prefs.json").exists());
        assert_eq!(file_store(dir.path()).get(), Prefs::default());
    }

    #[test]
    fn test_concurrent_writers_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FileBackend::new(dir.path()).unwrap());
        let store: Store<Option<String>> = Store::open("token", backend).unwrap();

        std::thread::scope(|scope| {
            for writer in 0..8 {
                let store = store.clone();
                scope.spawn(move || {
                    for i in 0..100 {
                        store.set(Some(format!("w{}-{}", writer, i))).unwrap();
                    }
                });
            }
        });

        let in_memory = store.get().unwrap();
        assert!(in_memory.ends_with("-99"));

        let reopened: Store<Option<String>> =
            Store::open("token", Arc::new(FileBackend::new(dir.path()).unwrap())).unwrap();
        assert_eq!(reopened.get().as_deref(), Some(in_memory.as_str()));
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let store: Store<Prefs> = Store::open("prefs", Arc::new(MemoryBackend::new())).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let store = store.clone();
                scope.spawn(move || {
                    for _ in 0..50 {
                        store.update(|p| p.top_n += 1).unwrap();
                    }
                });
            }
        });

        assert_eq!(store.get().top_n, 200);
    }

    #[test]
    fn test_clones_share_value() {
        let store: Store<Option<String>> =
            Store::open("token", Arc::new(MemoryBackend::new())).unwrap();
        let clone = store.clone();
        store.set(Some("abc".into())).unwrap();
        assert_eq!(clone.get().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_subscribers_see_writes() {
        let store: Store<Option<String>> =
            Store::open("token", Arc::new(MemoryBackend::new())).unwrap();
        let mut rx = store.subscribe();

        store.set(Some("t1".into())).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_deref(), Some("t1"));

        store.clear().unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }
}
