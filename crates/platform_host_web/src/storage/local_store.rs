//! `localStorage`-backed key-value store implementation.
//!
//! Keys are namespaced with a prefix so that [`KeyValueStore::clear`] only removes entries owned
//! by the desktop and leaves the rest of the origin's storage alone.

use platform_host::KeyValueStore;

/// Prefix applied to every key written by the desktop runtime.
pub const DEFAULT_KEY_PREFIX: &str = "retrodesk.";

#[derive(Debug, Clone, Copy)]
/// Browser key-value store backed by `window.localStorage`.
pub struct WebKeyValueStore {
    prefix: &'static str,
}

impl Default for WebKeyValueStore {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

impl WebKeyValueStore {
    /// Creates a store that namespaces every key with `prefix`.
    pub const fn with_prefix(prefix: &'static str) -> Self {
        Self { prefix }
    }

    /// Returns the full `localStorage` key for a logical store key.
    pub fn storage_key(self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Returns `true` when a raw `localStorage` key belongs to this store.
    pub fn owns_storage_key(self, storage_key: &str) -> bool {
        storage_key.starts_with(self.prefix)
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| "localStorage unavailable".to_string())
}

impl KeyValueStore for WebKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .get_item(&self.storage_key(key))
                .map_err(|e| format!("localStorage get_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    fn set(&self, key: &str, raw_json: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .set_item(&self.storage_key(key), raw_json)
                .map_err(|e| format!("localStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, raw_json);
            Ok(())
        }
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .remove_item(&self.storage_key(key))
                .map_err(|e| format!("localStorage remove_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }

    fn clear(&self) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = local_storage()?;
            let len = storage
                .length()
                .map_err(|e| format!("localStorage length failed: {e:?}"))?;
            let owned = (0..len)
                .filter_map(|idx| storage.key(idx).ok().flatten())
                .filter(|key| self.owns_storage_key(key))
                .collect::<Vec<_>>();
            for key in owned {
                storage
                    .remove_item(&key)
                    .map_err(|e| format!("localStorage remove_item failed: {e:?}"))?;
            }
            Ok(())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Ok(())
        }
    }
}
