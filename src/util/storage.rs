//! JSON-over-key/value persistence with error isolation.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session token, the session user, and the global app snapshot all live
//! in browser `localStorage`. Every consumer goes through [`PersistentStore`]
//! so serialization and quota failures stay contained here.
//!
//! ERROR HANDLING
//! ==============
//! Reads fall back to a caller-supplied value and writes never surface an
//! error. An in-memory overlay records every write and remove first, so the
//! running app observes its own writes even when the backend rejected them.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the serialized session user.
pub const USER_KEY: &str = "user";
/// Storage key for the persisted global app snapshot.
pub const APP_STATE_KEY: &str = "app-storage";

/// Failure reported by a [`StorageBackend`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// No storage is available in this environment.
    #[error("storage unavailable")]
    Unavailable,
    /// The write would exceed the backend's capacity.
    #[error("storage quota exceeded writing {key}")]
    QuotaExceeded { key: String },
    /// The backend rejected the operation for another reason.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Raw string key/value storage, e.g. `window.localStorage`.
pub trait StorageBackend {
    /// Read the raw value for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be accessed.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable or out of space.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be accessed.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// `window.localStorage` backend. Outside the browser every call reports
/// [`StorageError::Unavailable`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "csr")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

#[cfg(feature = "csr")]
fn js_error(err: &wasm_bindgen::JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl StorageBackend for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "csr")]
        {
            local_storage()?
                .get_item(key)
                .map_err(|e| StorageError::Backend(js_error(&e)))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            // Browsers only throw from setItem when the quota is exhausted.
            local_storage()?
                .set_item(key, value)
                .map_err(|_| StorageError::QuotaExceeded { key: key.to_owned() })
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            local_storage()?
                .remove_item(key)
                .map_err(|e| StorageError::Backend(js_error(&e)))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }
}

/// In-memory backend with an optional byte quota.
///
/// Used outside the browser and in tests. Cloning shares the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
    quota_bytes: Rc<Cell<Option<usize>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that rejects writes once keys plus values exceed `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        let storage = Self::default();
        storage.quota_bytes.set(Some(bytes));
        storage
    }

    /// Change the quota; `None` removes the limit.
    pub fn set_quota(&self, bytes: Option<usize>) {
        self.quota_bytes.set(bytes);
    }

    /// Raw value currently held for `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota_bytes.get() {
            if self.used_bytes_excluding(key) + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded { key: key.to_owned() });
            }
        }
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Typed JSON view over a [`StorageBackend`].
///
/// Cheap to clone; clones share the backend and the in-memory overlay.
#[derive(Clone)]
pub struct PersistentStore {
    backend: Rc<dyn StorageBackend>,
    // `None` entries are tombstones for removed keys.
    overlay: Rc<RefCell<HashMap<String, Option<serde_json::Value>>>>,
}

impl PersistentStore {
    pub fn new(backend: Rc<dyn StorageBackend>) -> Self {
        Self { backend, overlay: Rc::new(RefCell::new(HashMap::new())) }
    }

    /// Load `key`, returning `fallback` when the key is missing or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        self.get_opt(key).unwrap_or(fallback)
    }

    /// Load `key`, returning `None` when the key is missing or unreadable.
    pub fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let cached = self.overlay.borrow().get(key).cloned();
        match cached {
            Some(None) => None,
            Some(Some(value)) => match serde_json::from_value(value) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    log::warn!("storage: cached value for {key} has unexpected shape: {e}");
                    None
                }
            },
            None => self.read_backend(key),
        }
    }

    fn read_backend<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.read(key) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("storage: read of {key} failed: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::warn!("storage: discarding unparseable value for {key}: {e}");
                None
            }
        }
    }

    /// Store `value` under `key`. Failures are logged, never returned.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let json = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("storage: cannot serialize value for {key}: {e}");
                return;
            }
        };
        let raw = json.to_string();
        self.overlay.borrow_mut().insert(key.to_owned(), Some(json));
        if let Err(e) = self.backend.write(key, &raw) {
            log::warn!("storage: write of {key} failed, keeping in-memory value only: {e}");
        }
    }

    /// Remove `key`. Failures are logged, never returned.
    pub fn remove(&self, key: &str) {
        self.overlay.borrow_mut().insert(key.to_owned(), None);
        if let Err(e) = self.backend.delete(key) {
            log::warn!("storage: delete of {key} failed: {e}");
        }
    }

    /// Whether a value is currently present for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get_opt::<serde_json::Value>(key).is_some()
    }
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore")
            .field("overlay_keys", &self.overlay.borrow().len())
            .finish_non_exhaustive()
    }
}
