//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side host wiring layer for durable key-value storage.
//! Non-wasm builds compile the same API with inert fallbacks so runtime crates stay testable.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
/// `localStorage`-backed key-value storage.
pub mod storage;

pub use adapters::{
    host_strategy_name, key_value_store, selected_host_strategy, HostStrategy,
    KeyValueStoreAdapter,
};
pub use storage::local_store::{WebKeyValueStore, DEFAULT_KEY_PREFIX};
