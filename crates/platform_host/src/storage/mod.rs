//! Persistent key-value storage contracts, envelopes, and key names.

pub mod envelope;
pub mod keys;
pub mod kv;
