use platform_host::{KeyValueStore, MemoryKeyValueStore};

use crate::WebKeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for `platform_host_web` adapters.
pub enum HostStrategy {
    /// Browser-backed adapters from `platform_host_web`.
    Browser,
    /// In-memory placeholder adapters for headless desktop builds.
    DesktopStub,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "desktop-host-stub")]
    {
        HostStrategy::DesktopStub
    }

    #[cfg(not(feature = "desktop-host-stub"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::DesktopStub => "desktop-stub",
    }
}

/// Adapter enum that erases the concrete backend behind [`KeyValueStore`].
#[derive(Debug, Clone)]
pub enum KeyValueStoreAdapter {
    /// Browser-backed `localStorage` persistence.
    Browser(WebKeyValueStore),
    /// Session-only in-memory persistence.
    DesktopStub(MemoryKeyValueStore),
}

impl KeyValueStore for KeyValueStoreAdapter {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        match self {
            Self::Browser(store) => store.get(key),
            Self::DesktopStub(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, raw_json: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.set(key, raw_json),
            Self::DesktopStub(store) => store.set(key, raw_json),
        }
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.remove(key),
            Self::DesktopStub(store) => store.remove(key),
        }
    }

    fn clear(&self) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.clear(),
            Self::DesktopStub(store) => store.clear(),
        }
    }
}

/// Builds the key-value store for the selected host strategy.
pub fn key_value_store() -> KeyValueStoreAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => KeyValueStoreAdapter::Browser(WebKeyValueStore::default()),
        HostStrategy::DesktopStub => {
            KeyValueStoreAdapter::DesktopStub(MemoryKeyValueStore::default())
        }
    }
}
