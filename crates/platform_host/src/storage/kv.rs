//! Persistent key-value store contract and adapters.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Host service for durable JSON values stored as text per key.
///
/// Every call runs to completion on the caller's thread; browser `localStorage` is synchronous and
/// the desktop runtime relies on a mutation being persisted before the next event is handled.
pub trait KeyValueStore {
    /// Loads the raw JSON string stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, String>;

    /// Stores a raw JSON string under `key`, replacing any previous value.
    fn set(&self, key: &str, raw_json: &str) -> Result<(), String>;

    /// Removes `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), String>;

    /// Removes every key owned by this store.
    fn clear(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by string. Clones share the same backing map.
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    /// Returns all stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = self.inner.borrow().keys().cloned().collect::<Vec<_>>();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, raw_json: &str) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw_json.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), String> {
        self.inner.borrow_mut().clear();
        Ok(())
    }
}

/// Loads and deserializes a typed value through a [`KeyValueStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub fn load_typed_with<S: KeyValueStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed value through a [`KeyValueStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_typed_with<S: KeyValueStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct PrefThing {
        details_visible: bool,
    }

    #[test]
    fn memory_store_round_trip_remove_and_clear() {
        let store = MemoryKeyValueStore::default();
        let store_obj: &dyn KeyValueStore = &store;

        store_obj.set("pref.key", "{\"k\":1}").expect("set");
        store_obj.set("other", "2").expect("set");
        assert_eq!(
            store_obj.get("pref.key").expect("get"),
            Some("{\"k\":1}".to_string())
        );
        store_obj.remove("pref.key").expect("remove");
        assert_eq!(store_obj.get("pref.key").expect("get"), None);
        assert_eq!(store.keys(), vec!["other".to_string()]);

        store_obj.clear().expect("clear");
        assert!(store.keys().is_empty());
    }

    #[test]
    fn memory_store_clones_share_backing_map() {
        let store = MemoryKeyValueStore::default();
        let handle = store.clone();
        handle.set("k", "true").expect("set");
        assert_eq!(store.get("k").expect("get"), Some("true".to_string()));
    }

    #[test]
    fn typed_helpers_round_trip() {
        let store = MemoryKeyValueStore::default();
        save_typed_with(
            &store,
            "explorer",
            &PrefThing {
                details_visible: true,
            },
        )
        .expect("save typed");

        let loaded: Option<PrefThing> = load_typed_with(&store, "explorer").expect("load typed");
        assert_eq!(
            loaded,
            Some(PrefThing {
                details_visible: true
            })
        );
    }

    #[test]
    fn typed_load_reports_malformed_json() {
        let store = MemoryKeyValueStore::default();
        store.set("broken", "{not json").expect("set");
        let err = load_typed_with::<_, PrefThing>(&store, "broken").expect_err("decode error");
        assert!(!err.is_empty());
    }
}
