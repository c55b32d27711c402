//! Shared window-manager geometry and stacking helpers used by the desktop reducer.

use crate::{
    config::ScreenSize,
    model::{DesktopState, PointerPosition, ResizeEdge, SnapZone, WindowId, WindowRecord, WindowRect},
};

/// Default placement for the next window: centered above the taskbar, cascaded by the number of
/// windows already open, and clamped so the top-left corner stays on screen.
pub fn cascade_rect(state: &DesktopState) -> WindowRect {
    let config = &state.config;
    let step = state.windows.len() as i32 * config.cascade_offset;
    WindowRect {
        x: ((state.screen.width - config.default_width) / 2 + step).max(0),
        y: ((state.screen.height - config.default_height - config.taskbar_height) / 2 + step)
            .max(0),
        w: config.default_width,
        h: config.default_height,
    }
}

/// Applies resize deltas for a given edge/corner drag, keeping the opposite edges anchored.
pub fn resize_rect(
    start: WindowRect,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
    min_w: i32,
    min_h: i32,
) -> WindowRect {
    let mut rect = start;
    if edge.moves_east() {
        rect.w = (start.w + dx).max(min_w);
    }
    if edge.moves_west() {
        rect.w = (start.w - dx).max(min_w);
        rect.x = start.x + (start.w - rect.w);
    }
    if edge.moves_south() {
        rect.h = (start.h + dy).max(min_h);
    }
    if edge.moves_north() {
        rect.h = (start.h - dy).max(min_h);
        rect.y = start.y + (start.h - rect.h);
    }
    rect
}

/// Returns the snap zone armed by a pointer at `pointer`. Side edges win over the top edge.
pub fn snap_zone_at(pointer: PointerPosition, screen: ScreenSize, threshold: i32) -> Option<SnapZone> {
    if pointer.x <= threshold {
        Some(SnapZone::LeftHalf)
    } else if pointer.x >= screen.width - threshold {
        Some(SnapZone::RightHalf)
    } else if pointer.y <= threshold {
        Some(SnapZone::Maximize)
    } else {
        None
    }
}

/// Docked bounds for `zone` inside `work_area`.
pub fn snap_rect(zone: SnapZone, work_area: WindowRect) -> WindowRect {
    let half = work_area.w / 2;
    match zone {
        SnapZone::LeftHalf => WindowRect {
            w: half,
            ..work_area
        },
        SnapZone::RightHalf => WindowRect {
            x: work_area.x + half,
            w: half,
            ..work_area
        },
        SnapZone::Maximize => work_area,
    }
}

/// Allocates the next stacking value.
pub fn next_z_index(state: &mut DesktopState) -> u32 {
    let z = state.next_z_index;
    state.next_z_index = state.next_z_index.saturating_add(1);
    z
}

/// Allocates the next timer ticket.
pub fn next_ticket(state: &mut DesktopState) -> u64 {
    let ticket = state.next_ticket;
    state.next_ticket = state.next_ticket.saturating_add(1);
    ticket
}

/// Focuses and raises `window_id`, clearing focus everywhere else.
///
/// Returns `true` when stack/focus state changed.
pub fn focus_window_internal(state: &mut DesktopState, window_id: WindowId) -> bool {
    let Some(index) = state.windows.iter().position(|w| w.id == window_id) else {
        return false;
    };

    let top = state.windows.iter().map(|w| w.z_index).max().unwrap_or(0);
    let focused_count = state.windows.iter().filter(|w| w.is_focused).count();
    let already_focused_top = state.windows[index].is_focused
        && state.windows[index].z_index == top
        && focused_count == 1;
    if already_focused_top {
        return false;
    }

    for window in &mut state.windows {
        window.is_focused = false;
    }
    let z = next_z_index(state);
    let window = &mut state.windows[index];
    window.is_focused = true;
    window.z_index = z;
    true
}

/// Top-most window matching `filter`.
pub fn top_window(
    state: &DesktopState,
    filter: impl Fn(&WindowRecord) -> bool,
) -> Option<WindowId> {
    state
        .windows
        .iter()
        .filter(|w| filter(w))
        .max_by_key(|w| w.z_index)
        .map(|w| w.id)
}
