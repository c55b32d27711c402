//! Typed host-domain contracts and shared helpers used by the desktop runtime and browser adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the persistent
//! key-value store contract with its versioned envelope, virtual-path helpers, and time helpers,
//! while the concrete browser adapter lives in `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod fs;
pub mod storage;
pub mod time;

pub use fs::path::{
    is_same_or_descendant, join_virtual_path, normalize_virtual_path, parent_virtual_path,
    virtual_file_name,
};
pub use storage::envelope::{
    build_store_envelope, load_versioned_with, save_versioned_with, StoreEnvelope,
    STORE_ENVELOPE_VERSION,
};
pub use storage::keys::{
    DESKTOP_ICONS_KEY, FILESYSTEM_KEY, NOTIFICATIONS_KEY, PINNED_APPS_KEY, RECENT_APPS_KEY,
    SETTINGS_KEY, WINDOW_STATES_KEY,
};
pub use storage::kv::{load_typed_with, save_typed_with, KeyValueStore, MemoryKeyValueStore};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
