//! Persistent string key-value store backing widget field state.
//!
//! Keys are namespaced by route path plus field name (`/millis/timestamp`),
//! so views never step on each other by convention. The whole map is one
//! JSON object on disk and survives restarts; handles are cheap clones
//! sharing the same map.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use snafu::ResultExt;

use crate::error::{Error, Result, StoreFormatSnafu, StoreWriteSnafu};

#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    path: Option<PathBuf>,
    map: BTreeMap<String, String>,
}

impl Store {
    /// Open the store file at `path`, creating an empty store if the file
    /// does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let map = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).context(StoreFormatSnafu { path: &path })?,
            Err(source) if source.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(Error::StoreRead { path, source }),
        };
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                path: Some(path),
                map,
            })),
        })
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                path: None,
                map: BTreeMap::new(),
            })),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let inner = self.inner.lock().ok()?;
        inner.map.get(key).cloned()
    }

    /// Set a value and persist the store.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.lock().map_err(|_| Error::LockPoisoned)?;
        inner.map.insert(key.to_string(), value.to_string());
        inner.persist()
    }

    /// Remove a single key and persist the store.
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut inner = self.inner.lock().map_err(|_| Error::LockPoisoned)?;
        inner.map.remove(key);
        inner.persist()
    }

    /// Every stored key, in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.map.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove every key starting with `prefix` and persist the store. This
    /// is the bulk reset for one route's namespace.
    pub fn clear_prefix(&self, prefix: &str) -> Result<()> {
        let mut inner = self.inner.lock().map_err(|_| Error::LockPoisoned)?;
        inner.map.retain(|key, _| !key.starts_with(prefix));
        inner.persist()
    }
}

impl Inner {
    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = serde_json::to_string_pretty(&self.map)
            .expect("a string map always serializes");
        // Write-then-rename so a crash mid-write never corrupts the store.
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, text).context(StoreWriteSnafu { path: &tmp })?;
        std::fs::rename(&tmp, path).context(StoreWriteSnafu { path })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = Store::open(&path).unwrap();
        store.set("/millis/timestamp", "1700000000000").unwrap();
        store.set("/hmac/secret", "hunter2").unwrap();
        drop(store);

        let store = Store::open(&path).unwrap();
        assert_eq!(
            store.get("/millis/timestamp").as_deref(),
            Some("1700000000000")
        );
        assert_eq!(store.get("/hmac/secret").as_deref(), Some("hunter2"));
        assert_eq!(store.get("/missing"), None);
    }

    #[test]
    fn clear_prefix_only_touches_one_namespace() {
        let store = Store::in_memory();
        store.set("/json/jsoninput", "{}").unwrap();
        store.set("/json/escapedinput", "\"{}\"").unwrap();
        store.set("/jwt/token", "abc").unwrap();

        store.clear_prefix("/json").unwrap();
        assert_eq!(store.keys(), ["/jwt/token"]);
    }

    #[test]
    fn remove_and_overwrite() {
        let store = Store::in_memory();
        store.set("/text/input", "one").unwrap();
        store.set("/text/input", "two").unwrap();
        assert_eq!(store.get("/text/input").as_deref(), Some("two"));

        store.remove("/text/input").unwrap();
        assert_eq!(store.get("/text/input"), None);
    }

    #[test]
    fn corrupt_store_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(Store::open(&path).is_err());
    }
}
