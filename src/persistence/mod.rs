//! Key-value persistence
//!
//! Features:
//! - `KeyValueStore` trait over string keys and values
//! - In-memory store for native builds and tests
//! - JSON helpers that treat missing or malformed data as absent
//!
//! The browser `LocalStorage` backend lives in `platform::storage`.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// Durable string storage (LocalStorage on web)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Volatile store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read and decode a JSON value; `Ok(None)` when the key is missing
pub fn read_json<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub fn write_json<T: Serialize>(
    store: &impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Load a value, falling back to `T::default()` on any failure
pub fn load_or_default<T: DeserializeOwned + Default>(store: &impl KeyValueStore, key: &str) -> T {
    match read_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => {
            log::info!("Nothing stored under '{}', using defaults", key);
            T::default()
        }
        Err(e) => {
            log::warn!("Ignoring stored '{}': {}", key, e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let store = MemoryStore::new();
        store.set("numbers", "{not json").unwrap();
        assert!(read_json::<Vec<u32>>(&store, "numbers").is_err());
        let loaded: Vec<u32> = load_or_default(&store, "numbers");
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_missing_key_is_default() {
        let store = MemoryStore::new();
        let loaded: Vec<u32> = load_or_default(&store, "absent");
        assert!(loaded.is_empty());
    }
}
