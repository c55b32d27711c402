//! Lifecycle notifications for shell chrome (taskbar buttons, active-window highlight).

use std::collections::BTreeMap;

use crate::model::WindowId;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Window lifecycle change reported to chrome observers.
pub enum WindowEvent {
    /// A window was registered.
    Opened {
        /// New window.
        window_id: WindowId,
        /// Taskbar grouping key.
        app_key: String,
    },
    /// A window finished closing and was removed.
    Closed {
        /// Removed window.
        window_id: WindowId,
        /// Taskbar grouping key.
        app_key: String,
    },
    /// The focused window changed; `None` when no window is left to focus.
    FocusChanged {
        /// Newly focused window.
        window_id: Option<WindowId>,
    },
    /// A window finished minimizing.
    Minimized {
        /// Minimized window.
        window_id: WindowId,
    },
    /// A minimized window was brought back.
    Restored {
        /// Restored window.
        window_id: WindowId,
    },
}

/// Receives every [`WindowEvent`] emitted by the window manager, in order.
pub trait WindowObserver {
    fn on_window_event(&mut self, event: &WindowEvent);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Taskbar model: open window ids grouped per app key, plus the active window.
pub struct TaskbarIndex {
    groups: BTreeMap<String, Vec<WindowId>>,
    order: Vec<String>,
    active: Option<WindowId>,
}

impl TaskbarIndex {
    /// App keys with at least one open window, in first-launch order.
    pub fn running_apps(&self) -> &[String] {
        &self.order
    }

    pub fn windows_for(&self, app_key: &str) -> &[WindowId] {
        self.groups.get(app_key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn active_window(&self) -> Option<WindowId> {
        self.active
    }

    /// `true` when the focused window belongs to `app_key`.
    pub fn is_app_active(&self, app_key: &str) -> bool {
        self.active
            .is_some_and(|active| self.windows_for(app_key).contains(&active))
    }
}

impl WindowObserver for TaskbarIndex {
    fn on_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Opened { window_id, app_key } => {
                let group = self.groups.entry(app_key.clone()).or_default();
                if group.is_empty() {
                    self.order.push(app_key.clone());
                }
                if !group.contains(window_id) {
                    group.push(*window_id);
                }
            }
            WindowEvent::Closed { window_id, app_key } => {
                if let Some(group) = self.groups.get_mut(app_key) {
                    group.retain(|id| id != window_id);
                    if group.is_empty() {
                        self.groups.remove(app_key);
                        self.order.retain(|key| key != app_key);
                    }
                }
                if self.active == Some(*window_id) {
                    self.active = None;
                }
            }
            WindowEvent::FocusChanged { window_id } => self.active = *window_id,
            WindowEvent::Minimized { .. } | WindowEvent::Restored { .. } => {}
        }
    }
}
