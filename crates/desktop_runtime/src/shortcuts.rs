//! Global keyboard shortcuts for window management.

use crate::reducer::DesktopAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Key event reduced to what shortcut matching needs (`key` uses DOM key names).
pub struct KeyStroke<'a> {
    pub phase: KeyPhase,
    pub key: &'a str,
    pub alt: bool,
}

impl<'a> KeyStroke<'a> {
    pub fn down(key: &'a str, alt: bool) -> Self {
        Self {
            phase: KeyPhase::Down,
            key,
            alt,
        }
    }

    pub fn up(key: &'a str, alt: bool) -> Self {
        Self {
            phase: KeyPhase::Up,
            key,
            alt,
        }
    }
}

/// Maps a key stroke to a window-manager action.
///
/// While the switcher is open, Tab cycles, Enter or releasing Alt confirms, and Escape cancels.
/// Alt+F4 closes the focused window. Returns `None` for keys the desktop does not claim; callers
/// should only suppress the browser default when an action is returned.
pub fn shortcut_action(stroke: KeyStroke<'_>, switcher_open: bool) -> Option<DesktopAction> {
    match (stroke.phase, stroke.key) {
        (KeyPhase::Down, "Tab") if stroke.alt || switcher_open => Some(DesktopAction::ShowSwitcher),
        (KeyPhase::Down, "F4") if stroke.alt => Some(DesktopAction::CloseFocusedWindow),
        (KeyPhase::Down, "Enter") if switcher_open => Some(DesktopAction::ConfirmSwitcher),
        (KeyPhase::Down, "Escape") if switcher_open => Some(DesktopAction::CancelSwitcher),
        (KeyPhase::Up, "Alt") if switcher_open => Some(DesktopAction::ConfirmSwitcher),
        _ => None,
    }
}
