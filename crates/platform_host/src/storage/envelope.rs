//! Versioned envelope wrapped around every persisted value.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::kv::{load_typed_with, save_typed_with, KeyValueStore};

/// Version for [`StoreEnvelope`] metadata serialization.
pub const STORE_ENVELOPE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Versioned envelope for persisted payloads.
pub struct StoreEnvelope {
    /// Envelope schema version.
    pub envelope_version: u32,
    /// Store key the envelope was written under.
    pub key: String,
    /// Owner-defined schema version for the payload.
    pub schema_version: u32,
    /// Last update time in unix milliseconds.
    pub updated_at_unix_ms: u64,
    /// Serialized payload.
    pub payload: Value,
}

impl StoreEnvelope {
    /// Creates a new envelope and stamps it with a monotonic timestamp.
    pub fn new(key: impl Into<String>, schema_version: u32, payload: Value) -> Self {
        Self {
            envelope_version: STORE_ENVELOPE_VERSION,
            key: key.into(),
            schema_version,
            updated_at_unix_ms: crate::time::next_monotonic_timestamp_ms(),
            payload,
        }
    }

    /// Deserializes the payload into a target type.
    ///
    /// # Errors
    ///
    /// Returns an error when deserialization fails.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, String> {
        serde_json::from_value(self.payload.clone()).map_err(|e| e.to_string())
    }
}

/// Builds a versioned [`StoreEnvelope`] from a serializable payload.
///
/// # Errors
///
/// Returns an error when `payload` cannot be converted to JSON.
pub fn build_store_envelope<T: Serialize>(
    key: &str,
    schema_version: u32,
    payload: &T,
) -> Result<StoreEnvelope, String> {
    let payload = serde_json::to_value(payload).map_err(|e| e.to_string())?;
    Ok(StoreEnvelope::new(key, schema_version, payload))
}

/// Wraps `payload` in a [`StoreEnvelope`] and writes it under `key`.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_versioned_with<S: KeyValueStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    schema_version: u32,
    payload: &T,
) -> Result<(), String> {
    let envelope = build_store_envelope(key, schema_version, payload)?;
    save_typed_with(store, key, &envelope)
}

/// Loads the envelope stored under `key` and decodes its payload.
///
/// Envelopes written with the current `schema_version` are decoded directly. Any other version is
/// handed to `migrate`, which may return `Ok(None)` to discard the stored value.
///
/// # Errors
///
/// Returns an error when the store read, envelope decoding, payload decoding, or migration fails.
pub fn load_versioned_with<S, T, F>(
    store: &S,
    key: &str,
    schema_version: u32,
    migrate: F,
) -> Result<Option<T>, String>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
    F: FnOnce(u32, &StoreEnvelope) -> Result<Option<T>, String>,
{
    let Some(envelope) = load_typed_with::<_, StoreEnvelope>(store, key)? else {
        return Ok(None);
    };
    if envelope.schema_version == schema_version {
        return envelope.decode().map(Some);
    }
    migrate(envelope.schema_version, &envelope)
}
