//! Window geometry persistence.

use std::collections::BTreeMap;

use leptos::logging::warn;
use platform_host::{
    load_versioned_with, save_versioned_with, KeyValueStore, StoreEnvelope, WINDOW_STATES_KEY,
};
use serde::{Deserialize, Serialize};

use crate::model::{DesktopState, WindowRecord};

/// Schema version of the persisted window geometry map.
pub const WINDOW_STATES_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Last known geometry of one window.
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub maximized: bool,
    pub minimized: bool,
}

impl From<&WindowRecord> for WindowGeometry {
    fn from(window: &WindowRecord) -> Self {
        Self {
            x: window.rect.x,
            y: window.rect.y,
            width: window.rect.w,
            height: window.rect.h,
            maximized: window.maximized,
            minimized: window.minimized,
        }
    }
}

/// Geometry of every live window keyed by window id.
pub type WindowGeometryMap = BTreeMap<String, WindowGeometry>;

pub fn geometry_snapshot(state: &DesktopState) -> WindowGeometryMap {
    state
        .windows
        .iter()
        .map(|window| (window.id.to_string(), WindowGeometry::from(window)))
        .collect()
}

/// Writes the geometry of every live window, replacing the previous map.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn persist_window_geometry<S: KeyValueStore + ?Sized>(
    store: &S,
    state: &DesktopState,
) -> Result<(), String> {
    save_versioned_with(
        store,
        WINDOW_STATES_KEY,
        WINDOW_STATES_SCHEMA_VERSION,
        &geometry_snapshot(state),
    )
}

fn migrate_window_states(
    schema_version: u32,
    envelope: &StoreEnvelope,
) -> Result<Option<WindowGeometryMap>, String> {
    match schema_version {
        0 => envelope.decode().map(Some),
        _ => Ok(None),
    }
}

/// Loads the last persisted geometry map. Missing or unreadable data yields an empty map.
pub fn load_window_geometry<S: KeyValueStore + ?Sized>(store: &S) -> WindowGeometryMap {
    match load_versioned_with(
        store,
        WINDOW_STATES_KEY,
        WINDOW_STATES_SCHEMA_VERSION,
        migrate_window_states,
    ) {
        Ok(map) => map.unwrap_or_default(),
        Err(err) => {
            warn!("window geometry load failed: {err}");
            WindowGeometryMap::new()
        }
    }
}
