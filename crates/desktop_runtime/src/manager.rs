//! Window manager service: owns the reducer state and executes its runtime effects.
//!
//! [`WindowManager`] is UI-framework agnostic. The Leptos composition root wraps it, arms the
//! timers it requests, and mirrors its state into signals. Tests drive it directly and fire
//! timers by hand.

use std::{collections::BTreeMap, rc::Rc};

use leptos::logging::{debug_warn, warn};
use platform_host::KeyValueStore;
use serde_json::Value;

use crate::{
    chrome::{TaskbarIndex, WindowEvent, WindowObserver},
    config::{ScreenSize, WindowManagerConfig},
    model::{
        DesktopState, InteractionState, OpenWindowRequest, PointerPosition, SnapZone, WindowId,
        WindowRecord, WindowRegion,
    },
    persistence::persist_window_geometry,
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect, ScheduledTimer},
    shortcuts::{shortcut_action, KeyStroke},
};

/// Desktop window manager.
///
/// Every public operation taking a window id is a no-op for unknown ids.
pub struct WindowManager {
    state: DesktopState,
    interaction: InteractionState,
    store: Rc<dyn KeyValueStore>,
    taskbar: TaskbarIndex,
    observers: Vec<Box<dyn WindowObserver>>,
    /// Armed timers that have neither fired nor been cancelled.
    timers: BTreeMap<u64, ScheduledTimer>,
    /// Timers armed since the host last called [`WindowManager::take_armed_timers`].
    armed: Vec<ScheduledTimer>,
}

impl std::fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManager")
            .field("state", &self.state)
            .field("interaction", &self.interaction)
            .field("taskbar", &self.taskbar)
            .field("timers", &self.timers)
            .finish_non_exhaustive()
    }
}

impl WindowManager {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, WindowManagerConfig::default())
    }

    pub fn with_config(store: Rc<dyn KeyValueStore>, config: WindowManagerConfig) -> Self {
        Self {
            state: DesktopState::with_config(config),
            interaction: InteractionState::default(),
            store,
            taskbar: TaskbarIndex::default(),
            observers: Vec::new(),
            timers: BTreeMap::new(),
            armed: Vec::new(),
        }
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn taskbar(&self) -> &TaskbarIndex {
        &self.taskbar
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.state.window(window_id)
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.state.focused_window_id()
    }

    /// Registers an observer for every subsequent [`WindowEvent`].
    pub fn add_observer(&mut self, observer: Box<dyn WindowObserver>) {
        self.observers.push(observer);
    }

    /// Applies `action` and runs its effects. Returns `false` when the action referenced a
    /// missing window and was ignored.
    pub fn dispatch(&mut self, action: DesktopAction) -> bool {
        match reduce_desktop(&mut self.state, &mut self.interaction, action) {
            Ok(effects) => {
                self.run_effects(effects);
                true
            }
            Err(err) => {
                debug_warn!("ignoring window action: {err}");
                false
            }
        }
    }

    /// Opens a window for `app_name` and returns its id.
    pub fn open_app(&mut self, app_name: &str, app_data: Value) -> WindowId {
        let window_id = WindowId(self.state.next_window_id);
        self.dispatch(DesktopAction::OpenWindow(OpenWindowRequest::with_data(
            app_name, app_data,
        )));
        window_id
    }

    pub fn close_window(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::CloseWindow { window_id });
    }

    pub fn minimize_window(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::MinimizeWindow { window_id });
    }

    pub fn restore_window(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::RestoreWindow { window_id });
    }

    pub fn toggle_maximize(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::ToggleMaximize { window_id });
    }

    pub fn focus_window(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::FocusWindow { window_id });
    }

    pub fn snap_window(&mut self, window_id: WindowId, zone: SnapZone) {
        self.dispatch(DesktopAction::SnapWindow { window_id, zone });
    }

    /// Taskbar button click for a single window.
    pub fn taskbar_click(&mut self, window_id: WindowId) {
        self.dispatch(DesktopAction::ToggleTaskbarWindow { window_id });
    }

    /// Taskbar context menu: minimize every window of an app.
    pub fn minimize_app(&mut self, app_key: &str) {
        for window_id in self.taskbar.windows_for(app_key).to_vec() {
            self.minimize_window(window_id);
        }
    }

    /// Taskbar context menu: restore every minimized window of an app.
    pub fn restore_app(&mut self, app_key: &str) {
        for window_id in self.taskbar.windows_for(app_key).to_vec() {
            let minimized = self
                .window(window_id)
                .is_some_and(|w| w.minimized || w.is_minimizing());
            if minimized {
                self.restore_window(window_id);
            }
        }
    }

    /// Taskbar context menu: close every window of an app.
    pub fn close_app(&mut self, app_key: &str) {
        for window_id in self.taskbar.windows_for(app_key).to_vec() {
            self.close_window(window_id);
        }
    }

    pub fn pointer_down(
        &mut self,
        window_id: WindowId,
        region: WindowRegion,
        pointer: PointerPosition,
    ) {
        self.dispatch(DesktopAction::PointerDown {
            window_id,
            region,
            pointer,
        });
    }

    pub fn pointer_move(&mut self, pointer: PointerPosition) {
        if !self.interaction.session.is_idle() {
            self.dispatch(DesktopAction::PointerMove { pointer });
        }
    }

    pub fn pointer_up(&mut self, pointer: PointerPosition) {
        if !self.interaction.session.is_idle() {
            self.dispatch(DesktopAction::PointerUp { pointer });
        }
    }

    pub fn set_screen_size(&mut self, screen: ScreenSize) {
        if self.state.screen != screen {
            self.dispatch(DesktopAction::SetScreenSize { screen });
        }
    }

    pub fn show_window_switcher(&mut self) {
        self.dispatch(DesktopAction::ShowSwitcher);
    }

    pub fn confirm_window_switcher(&mut self) {
        self.dispatch(DesktopAction::ConfirmSwitcher);
    }

    pub fn cancel_window_switcher(&mut self) {
        self.dispatch(DesktopAction::CancelSwitcher);
    }

    pub fn close_focused_window(&mut self) {
        self.dispatch(DesktopAction::CloseFocusedWindow);
    }

    /// Routes a global key stroke. Returns `true` when the desktop claimed it.
    pub fn handle_key(&mut self, stroke: KeyStroke<'_>) -> bool {
        match shortcut_action(stroke, self.interaction.switcher.is_some()) {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    /// Timers armed since the last call; the host schedules each one and calls
    /// [`WindowManager::fire_timer`] after its delay.
    pub fn take_armed_timers(&mut self) -> Vec<ScheduledTimer> {
        std::mem::take(&mut self.armed)
    }

    /// Timers still waiting to fire, in ticket order.
    pub fn pending_timers(&self) -> Vec<ScheduledTimer> {
        self.timers.values().copied().collect()
    }

    /// Completes the timer with `ticket`. Returns `false` when it was cancelled or already fired.
    pub fn fire_timer(&mut self, ticket: u64) -> bool {
        let Some(timer) = self.timers.remove(&ticket) else {
            return false;
        };
        self.armed.retain(|armed| armed.ticket != ticket);
        self.dispatch(timer.completion_action())
    }

    /// Fires every pending timer, including ones armed while firing, in ticket order.
    pub fn flush_timers(&mut self) {
        while let Some(ticket) = self.timers.keys().next().copied() {
            self.fire_timer(ticket);
        }
    }

    fn run_effects(&mut self, effects: Vec<RuntimeEffect>) {
        for effect in effects {
            match effect {
                RuntimeEffect::PersistGeometry => {
                    if let Err(err) = persist_window_geometry(&*self.store, &self.state) {
                        warn!("window geometry persist failed: {err}");
                    }
                }
                RuntimeEffect::Notify(event) => self.notify(&event),
                RuntimeEffect::Schedule(timer) => {
                    self.timers.insert(timer.ticket, timer);
                    self.armed.push(timer);
                }
                RuntimeEffect::CancelTimer { ticket } => {
                    self.timers.remove(&ticket);
                    self.armed.retain(|armed| armed.ticket != ticket);
                }
            }
        }
    }

    fn notify(&mut self, event: &WindowEvent) {
        self.taskbar.on_window_event(event);
        for observer in &mut self.observers {
            observer.on_window_event(event);
        }
    }
}
