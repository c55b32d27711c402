//! Alt+Tab overlay model.

use crate::model::{DesktopState, SwitcherOverlay, WindowId};

/// Switchable windows in opening order. Windows that are closing are left out.
pub fn entries(state: &DesktopState) -> Vec<WindowId> {
    state
        .windows
        .iter()
        .filter(|w| !w.is_closing())
        .map(|w| w.id)
        .collect()
}

/// New overlay with the cursor on the first entry.
pub fn open_overlay(entries: Vec<WindowId>, ticket: u64) -> SwitcherOverlay {
    SwitcherOverlay {
        entries,
        selected: 0,
        ticket,
    }
}

/// Moves the cursor to the next entry, wrapping at the end.
pub fn advance(overlay: &mut SwitcherOverlay) {
    if !overlay.entries.is_empty() {
        overlay.selected = (overlay.selected + 1) % overlay.entries.len();
    }
}
