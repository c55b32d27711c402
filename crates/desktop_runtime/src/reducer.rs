//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use serde_json::Value;
use thiserror::Error;

use crate::{
    chrome::WindowEvent,
    config::ScreenSize,
    model::{
        DesktopState, DragSession, InteractionSession, InteractionState, OpenWindowRequest,
        PendingTransition, PointerPosition, ResizeSession, SnapZone, TransitionKind, WindowId,
        WindowRecord, WindowRect, WindowRegion,
    },
    switcher,
    window_manager::{
        cascade_rect, focus_window_internal, next_ticket, resize_rect, snap_rect, snap_zone_at,
        top_window,
    },
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a new window for an application launch request.
    OpenWindow(OpenWindowRequest),
    /// Start the closing transition of a window.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Start the minimizing transition of a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Bring back a minimized (or minimizing) window and focus it.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Maximize, or restore from maximize when already maximized.
    ToggleMaximize {
        /// Window whose maximize state flips.
        window_id: WindowId,
    },
    /// Fill the work area, remembering the previous bounds.
    MaximizeWindow {
        /// Window to maximize.
        window_id: WindowId,
    },
    /// Return a maximized or snapped window to its remembered bounds.
    RestoreFromMaximize {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Dock a window into a snap zone.
    SnapWindow {
        /// Window to dock.
        window_id: WindowId,
        /// Target zone.
        zone: SnapZone,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Taskbar button press: restore if minimized, minimize if focused, focus otherwise.
    ToggleTaskbarWindow {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// A transition timer fired.
    CompleteTransition {
        /// Window the transition belongs to.
        window_id: WindowId,
        /// Ticket issued when the transition was scheduled.
        ticket: u64,
    },
    /// Pointer pressed on a window.
    PointerDown {
        /// Window under the pointer.
        window_id: WindowId,
        /// Chrome region that received the press.
        region: WindowRegion,
        /// Pointer position.
        pointer: PointerPosition,
    },
    /// Pointer moved anywhere on screen.
    PointerMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// Pointer released anywhere on screen.
    PointerUp {
        /// Release position.
        pointer: PointerPosition,
    },
    /// Host viewport changed size.
    SetScreenSize {
        /// New viewport size.
        screen: ScreenSize,
    },
    /// Open the window switcher, or advance its cursor when already open.
    ShowSwitcher,
    /// Activate the selected switcher entry and dismiss the overlay.
    ConfirmSwitcher,
    /// Dismiss the switcher without activating anything.
    CancelSwitcher,
    /// The switcher auto-dismiss timer fired.
    SwitcherTimeout {
        /// Ticket issued when the overlay opened.
        ticket: u64,
    },
    /// Close whichever window currently has focus.
    CloseFocusedWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What a scheduled timer completes.
pub enum TimerKind {
    /// Minimize or close transition of a window.
    Transition {
        /// Window the transition belongs to.
        window_id: WindowId,
    },
    /// Window switcher auto-dismiss.
    SwitcherTimeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Delayed task requested by the reducer; the host fires it by dispatching
/// [`ScheduledTimer::completion_action`] after `delay_ms`.
pub struct ScheduledTimer {
    /// Unique ticket; also used to cancel the timer.
    pub ticket: u64,
    /// Delay before completion.
    pub delay_ms: u32,
    /// Completion target.
    pub kind: TimerKind,
}

impl ScheduledTimer {
    /// Action to dispatch when the timer fires.
    pub fn completion_action(&self) -> DesktopAction {
        match self.kind {
            TimerKind::Transition { window_id } => DesktopAction::CompleteTransition {
                window_id,
                ticket: self.ticket,
            },
            TimerKind::SwitcherTimeout => DesktopAction::SwitcherTimeout {
                ticket: self.ticket,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the runtime host to execute.
pub enum RuntimeEffect {
    /// Persist the geometry of every live window.
    PersistGeometry,
    /// Deliver a lifecycle event to chrome observers.
    Notify(WindowEvent),
    /// Arm a delayed task.
    Schedule(ScheduledTimer),
    /// Drop a previously scheduled task.
    CancelTimer {
        /// Ticket of the timer to drop.
        ticket: u64,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions (for example, referencing a missing window).
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window {0} not found")]
    WindowNotFound(WindowId),
}

/// Applies a [`DesktopAction`] to the desktop runtime state and collects resulting side effects.
///
/// This function is the authoritative state transition engine for window management. It never
/// performs I/O: persistence, chrome notification and timers are returned as [`RuntimeEffect`]s.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a window that is not present.
/// Stale timer completions are not errors; they are ignored.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            let window_id = next_window_id(state);
            let rect = cascade_rect(state);
            let title = data_str(&req.app_data, "name")
                .unwrap_or(&req.app_name)
                .to_string();
            let icon = data_str(&req.app_data, "icon").map(str::to_string);
            let app_key = data_str(&req.app_data, "id")
                .unwrap_or(&req.app_name)
                .to_string();
            state.windows.push(WindowRecord {
                id: window_id,
                app_name: req.app_name,
                app_data: req.app_data,
                title,
                icon,
                app_key: app_key.clone(),
                rect,
                restore_rect: None,
                z_index: 0,
                is_focused: false,
                minimized: false,
                maximized: false,
                pending: None,
            });
            effects.push(RuntimeEffect::Notify(WindowEvent::Opened { window_id, app_key }));
            focus_with_event(state, window_id, &mut effects);
            request_persist(&mut effects);
        }
        DesktopAction::CloseWindow { window_id } => {
            let window = find_window(state, window_id)?;
            if window.is_closing() {
                return Ok(effects);
            }
            let superseded = window.pending;
            if let Some(pending) = superseded {
                effects.push(RuntimeEffect::CancelTimer {
                    ticket: pending.ticket,
                });
            }
            schedule_transition(state, window_id, TransitionKind::Close, &mut effects)?;
        }
        DesktopAction::MinimizeWindow { window_id } => {
            let window = find_window(state, window_id)?;
            if window.minimized || window.pending.is_some() {
                return Ok(effects);
            }
            schedule_transition(state, window_id, TransitionKind::Minimize, &mut effects)?;
        }
        DesktopAction::RestoreWindow { window_id } => {
            restore_window(state, window_id, &mut effects)?;
        }
        DesktopAction::ToggleMaximize { window_id } => {
            if find_window(state, window_id)?.maximized {
                restore_from_maximize(state, window_id, &mut effects)?;
            } else {
                maximize_window(state, window_id, &mut effects)?;
            }
        }
        DesktopAction::MaximizeWindow { window_id } => {
            maximize_window(state, window_id, &mut effects)?;
        }
        DesktopAction::RestoreFromMaximize { window_id } => {
            restore_from_maximize(state, window_id, &mut effects)?;
        }
        DesktopAction::SnapWindow { window_id, zone } => {
            snap_window(state, window_id, zone, &mut effects)?;
        }
        DesktopAction::FocusWindow { window_id } => {
            if !find_window(state, window_id)?.is_closing() {
                focus_with_event(state, window_id, &mut effects);
            }
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            let window = find_window(state, window_id)?;
            if window.is_closing() {
                return Ok(effects);
            }
            let action = if window.minimized || window.is_minimizing() {
                DesktopAction::RestoreWindow { window_id }
            } else if window.is_focused {
                DesktopAction::MinimizeWindow { window_id }
            } else {
                DesktopAction::FocusWindow { window_id }
            };
            effects.extend(reduce_desktop(state, interaction, action)?);
        }
        DesktopAction::CompleteTransition { window_id, ticket } => {
            complete_transition(state, interaction, window_id, ticket, &mut effects);
        }
        DesktopAction::PointerDown {
            window_id,
            region,
            pointer,
        } => {
            let window = find_window(state, window_id)?;
            if window.is_closing() {
                return Ok(effects);
            }
            let (rect_start, maximized) = (window.rect, window.maximized);
            focus_with_event(state, window_id, &mut effects);

            if !interaction.session.is_idle() || maximized {
                return Ok(effects);
            }
            match region {
                WindowRegion::TitleBar => {
                    interaction.session = InteractionSession::Dragging(DragSession {
                        window_id,
                        pointer_start: pointer,
                        rect_start,
                        moved: false,
                        snap_preview: None,
                    });
                }
                WindowRegion::Resize(edge) => {
                    interaction.session = InteractionSession::Resizing(ResizeSession {
                        window_id,
                        edge,
                        pointer_start: pointer,
                        rect_start,
                    });
                }
                WindowRegion::Controls | WindowRegion::Content => {}
            }
        }
        DesktopAction::PointerMove { pointer } => {
            pointer_move(state, interaction, pointer)?;
        }
        DesktopAction::PointerUp { pointer } => {
            match std::mem::take(&mut interaction.session) {
                InteractionSession::Idle => {}
                InteractionSession::Dragging(session) => {
                    if session.moved {
                        let threshold = state.config.snap_threshold;
                        if let Some(zone) = snap_zone_at(pointer, state.screen, threshold) {
                            snap_window(state, session.window_id, zone, &mut effects)?;
                        }
                    }
                    request_persist(&mut effects);
                }
                InteractionSession::Resizing(_) => request_persist(&mut effects),
            }
        }
        DesktopAction::SetScreenSize { screen } => {
            state.screen = screen;
            let area = state.work_area();
            let mut refitted = false;
            for window in state.windows.iter_mut().filter(|w| w.maximized) {
                if window.rect != area {
                    window.rect = area;
                    refitted = true;
                }
            }
            if refitted {
                request_persist(&mut effects);
            }
        }
        DesktopAction::ShowSwitcher => {
            if let Some(overlay) = interaction.switcher.as_mut() {
                switcher::advance(overlay);
                return Ok(effects);
            }
            let entries = switcher::entries(state);
            if entries.is_empty() {
                return Ok(effects);
            }
            let ticket = next_ticket(state);
            interaction.switcher = Some(switcher::open_overlay(entries, ticket));
            effects.push(RuntimeEffect::Schedule(ScheduledTimer {
                ticket,
                delay_ms: state.config.switcher_timeout_ms,
                kind: TimerKind::SwitcherTimeout,
            }));
        }
        DesktopAction::ConfirmSwitcher => {
            if let Some(overlay) = interaction.switcher.take() {
                effects.push(RuntimeEffect::CancelTimer {
                    ticket: overlay.ticket,
                });
                if let Some(window_id) = overlay.selected_window() {
                    activate_window(state, interaction, window_id, &mut effects)?;
                }
            }
        }
        DesktopAction::CancelSwitcher => {
            if let Some(overlay) = interaction.switcher.take() {
                effects.push(RuntimeEffect::CancelTimer {
                    ticket: overlay.ticket,
                });
            }
        }
        DesktopAction::SwitcherTimeout { ticket } => {
            let current = interaction.switcher.as_ref().map(|overlay| overlay.ticket);
            if current == Some(ticket) {
                if let Some(window_id) = interaction
                    .switcher
                    .take()
                    .and_then(|overlay| overlay.selected_window())
                {
                    activate_window(state, interaction, window_id, &mut effects)?;
                }
            }
        }
        DesktopAction::CloseFocusedWindow => {
            if let Some(window_id) = state.focused_window_id() {
                effects.extend(reduce_desktop(
                    state,
                    interaction,
                    DesktopAction::CloseWindow { window_id },
                )?);
            }
        }
    }

    Ok(effects)
}

fn data_str<'a>(app_data: &'a Value, field: &str) -> Option<&'a str> {
    app_data.get(field).and_then(Value::as_str)
}

fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

fn find_window(state: &DesktopState, window_id: WindowId) -> Result<&WindowRecord, ReducerError> {
    state
        .window(window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))
}

fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))
}

fn request_persist(effects: &mut Vec<RuntimeEffect>) {
    if !effects.contains(&RuntimeEffect::PersistGeometry) {
        effects.push(RuntimeEffect::PersistGeometry);
    }
}

fn focus_with_event(state: &mut DesktopState, window_id: WindowId, effects: &mut Vec<RuntimeEffect>) {
    let before = state.focused_window_id();
    focus_window_internal(state, window_id);
    let after = state.focused_window_id();
    if after != before {
        effects.push(RuntimeEffect::Notify(WindowEvent::FocusChanged { window_id: after }));
    }
}

fn schedule_transition(
    state: &mut DesktopState,
    window_id: WindowId,
    kind: TransitionKind,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let ticket = next_ticket(state);
    let delay_ms = state.config.transition_ms;
    find_window_mut(state, window_id)?.pending = Some(PendingTransition { ticket, kind });
    effects.push(RuntimeEffect::Schedule(ScheduledTimer {
        ticket,
        delay_ms,
        kind: TimerKind::Transition { window_id },
    }));
    Ok(())
}

fn complete_transition(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    window_id: WindowId,
    ticket: u64,
    effects: &mut Vec<RuntimeEffect>,
) {
    let Some(index) = state.windows.iter().position(|w| w.id == window_id) else {
        return;
    };
    let Some(pending) = state.windows[index]
        .pending
        .filter(|pending| pending.ticket == ticket)
    else {
        return;
    };
    state.windows[index].pending = None;

    match pending.kind {
        TransitionKind::Minimize => {
            let window = &mut state.windows[index];
            window.minimized = true;
            let was_focused = window.is_focused;
            effects.push(RuntimeEffect::Notify(WindowEvent::Minimized { window_id }));
            if was_focused {
                if let Some(next) =
                    top_window(state, |w| w.id != window_id && !w.minimized && !w.is_closing())
                {
                    focus_with_event(state, next, effects);
                }
            }
            request_persist(effects);
        }
        TransitionKind::Close => {
            let removed = state.windows.remove(index);
            if interaction.session.window_id() == Some(window_id) {
                interaction.session = InteractionSession::Idle;
            }
            effects.push(RuntimeEffect::Notify(WindowEvent::Closed {
                window_id,
                app_key: removed.app_key,
            }));
            if removed.is_focused {
                let next = top_window(state, |w| !w.minimized && !w.is_closing())
                    .or_else(|| top_window(state, |w| !w.is_closing()))
                    .or_else(|| top_window(state, |_| true));
                match next {
                    Some(next) => focus_with_event(state, next, effects),
                    None => effects.push(RuntimeEffect::Notify(WindowEvent::FocusChanged {
                        window_id: None,
                    })),
                }
            }
            request_persist(effects);
        }
    }
}

fn restore_window(
    state: &mut DesktopState,
    window_id: WindowId,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let window = find_window_mut(state, window_id)?;
    if window.is_closing() {
        return Ok(());
    }
    if let Some(pending) = window.pending.take() {
        effects.push(RuntimeEffect::CancelTimer {
            ticket: pending.ticket,
        });
    }
    let was_minimized = window.minimized;
    window.minimized = false;
    if was_minimized {
        effects.push(RuntimeEffect::Notify(WindowEvent::Restored { window_id }));
        request_persist(effects);
    }
    focus_with_event(state, window_id, effects);
    Ok(())
}

fn maximize_window(
    state: &mut DesktopState,
    window_id: WindowId,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let area = state.work_area();
    let window = find_window_mut(state, window_id)?;
    if window.maximized {
        return Ok(());
    }
    if window.restore_rect.is_none() {
        window.restore_rect = Some(window.rect);
    }
    window.rect = area;
    window.maximized = true;
    request_persist(effects);
    Ok(())
}

fn restore_from_maximize(
    state: &mut DesktopState,
    window_id: WindowId,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let window = find_window_mut(state, window_id)?;
    let Some(rect) = window.restore_rect.take() else {
        return Ok(());
    };
    window.rect = rect;
    window.maximized = false;
    request_persist(effects);
    Ok(())
}

fn snap_window(
    state: &mut DesktopState,
    window_id: WindowId,
    zone: SnapZone,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    if zone == SnapZone::Maximize {
        return maximize_window(state, window_id, effects);
    }
    let rect = snap_rect(zone, state.work_area());
    let window = find_window_mut(state, window_id)?;
    if window.restore_rect.is_none() {
        window.restore_rect = Some(window.rect);
    }
    window.rect = rect;
    window.maximized = false;
    request_persist(effects);
    Ok(())
}

fn pointer_move(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    pointer: PointerPosition,
) -> Result<(), ReducerError> {
    let config = state.config;
    match interaction.session.clone() {
        InteractionSession::Idle => {}
        InteractionSession::Dragging(mut session) => {
            let dx = pointer.x - session.pointer_start.x;
            let dy = pointer.y - session.pointer_start.y;
            if !session.moved && dx.abs() <= config.drag_threshold && dy.abs() <= config.drag_threshold
            {
                return Ok(());
            }
            let screen = state.screen;
            let window = find_window_mut(state, session.window_id)?;
            if window.maximized {
                return Ok(());
            }
            if !session.moved && window.is_snapped() {
                window.restore_rect = None;
            }
            window.rect = WindowRect {
                x: session.rect_start.x + dx,
                y: (session.rect_start.y + dy).max(0),
                ..session.rect_start
            };
            session.moved = true;
            session.snap_preview = snap_zone_at(pointer, screen, config.snap_threshold);
            interaction.session = InteractionSession::Dragging(session);
        }
        InteractionSession::Resizing(session) => {
            let dx = pointer.x - session.pointer_start.x;
            let dy = pointer.y - session.pointer_start.y;
            let window = find_window_mut(state, session.window_id)?;
            if window.maximized {
                return Ok(());
            }
            window.rect = resize_rect(
                session.rect_start,
                session.edge,
                dx,
                dy,
                config.min_width,
                config.min_height,
            );
            if window.is_snapped() {
                window.restore_rect = None;
            }
        }
    }
    Ok(())
}

fn activate_window(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    window_id: WindowId,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let Some(window) = state.window(window_id) else {
        return Ok(());
    };
    if window.is_closing() {
        return Ok(());
    }
    let action = if window.minimized || window.is_minimizing() {
        DesktopAction::RestoreWindow { window_id }
    } else {
        DesktopAction::FocusWindow { window_id }
    };
    effects.extend(reduce_desktop(state, interaction, action)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::ResizeEdge;

    fn open(state: &mut DesktopState, interaction: &mut InteractionState, app: &str) -> WindowId {
        reduce_desktop(
            state,
            interaction,
            DesktopAction::OpenWindow(OpenWindowRequest::new(app)),
        )
        .expect("open window");
        state.windows.last().expect("window").id
    }

    fn scheduled(effects: &[RuntimeEffect]) -> Vec<ScheduledTimer> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                RuntimeEffect::Schedule(timer) => Some(*timer),
                _ => None,
            })
            .collect()
    }

    fn fire(
        state: &mut DesktopState,
        interaction: &mut InteractionState,
        timer: ScheduledTimer,
    ) -> Vec<RuntimeEffect> {
        reduce_desktop(state, interaction, timer.completion_action()).expect("fire timer")
    }

    fn at(x: i32, y: i32) -> PointerPosition {
        PointerPosition { x, y }
    }

    #[test]
    fn open_window_focuses_new_window_and_cascades() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let first = open(&mut state, &mut interaction, "notepad");
        let second = open(&mut state, &mut interaction, "notepad");

        assert_eq!(state.focused_window_id(), Some(second));
        let a = state.window(first).expect("first");
        let b = state.window(second).expect("second");
        assert!(b.z_index > a.z_index);
        assert_eq!((a.rect.x, a.rect.y), (112, 54));
        assert_eq!((b.rect.x, b.rect.y), (142, 84));
    }

    #[test]
    fn open_window_reads_title_icon_and_key_from_app_data() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::OpenWindow(OpenWindowRequest::with_data(
                "explorer",
                json!({"id": "fileexplorer", "name": "File Explorer", "icon": "folder"}),
            )),
        )
        .expect("open");

        let window = &state.windows[0];
        assert_eq!(window.title, "File Explorer");
        assert_eq!(window.icon.as_deref(), Some("folder"));
        assert_eq!(window.app_key, "fileexplorer");
        assert_eq!(
            effects,
            vec![
                RuntimeEffect::Notify(WindowEvent::Opened {
                    window_id: window.id,
                    app_key: "fileexplorer".to_string(),
                }),
                RuntimeEffect::Notify(WindowEvent::FocusChanged {
                    window_id: Some(window.id),
                }),
                RuntimeEffect::PersistGeometry,
            ]
        );
    }

    #[test]
    fn close_is_deferred_until_the_transition_completes() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let first = open(&mut state, &mut interaction, "notepad");
        let second = open(&mut state, &mut interaction, "browser");

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id: second },
        )
        .expect("close");
        let timers = scheduled(&effects);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].delay_ms, 250);
        assert!(state.window(second).is_some_and(WindowRecord::is_closing));

        let effects = fire(&mut state, &mut interaction, timers[0]);
        assert!(state.window(second).is_none());
        assert_eq!(state.focused_window_id(), Some(first));
        assert!(effects.contains(&RuntimeEffect::Notify(WindowEvent::Closed {
            window_id: second,
            app_key: "browser".to_string(),
        })));
        assert!(effects.contains(&RuntimeEffect::PersistGeometry));
    }

    #[test]
    fn stale_or_repeated_completions_are_ignored() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "notepad");

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id: id },
        )
        .expect("close");
        let timer = scheduled(&effects)[0];
        fire(&mut state, &mut interaction, timer);
        assert!(fire(&mut state, &mut interaction, timer).is_empty());
        assert!(state.windows.is_empty());
    }

    #[test]
    fn closing_a_minimizing_window_supersedes_the_minimize() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "notepad");

        let minimize = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow { window_id: id },
        )
        .expect("minimize");
        let minimize_timer = scheduled(&minimize)[0];

        let close = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id: id },
        )
        .expect("close");
        assert!(close.contains(&RuntimeEffect::CancelTimer {
            ticket: minimize_timer.ticket
        }));

        assert!(fire(&mut state, &mut interaction, minimize_timer).is_empty());
        assert!(!state.windows[0].minimized);

        fire(&mut state, &mut interaction, scheduled(&close)[0]);
        assert!(state.windows.is_empty());
    }

    #[test]
    fn minimize_hands_focus_to_the_next_visible_window() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let first = open(&mut state, &mut interaction, "notepad");
        let second = open(&mut state, &mut interaction, "notepad");

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow { window_id: second },
        )
        .expect("minimize");
        assert!(!state.window(second).expect("window").minimized);

        let rect_before = state.window(second).expect("window").rect;
        fire(&mut state, &mut interaction, scheduled(&effects)[0]);
        let minimized = state.window(second).expect("window");
        assert!(minimized.minimized);
        assert_eq!(minimized.rect, rect_before);
        assert_eq!(state.focused_window_id(), Some(first));
    }

    #[test]
    fn restore_cancels_a_pending_minimize() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "notepad");

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow { window_id: id },
        )
        .expect("minimize");
        let timer = scheduled(&effects)[0];
        let restore = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::RestoreWindow { window_id: id },
        )
        .expect("restore");

        assert_eq!(
            restore,
            vec![RuntimeEffect::CancelTimer {
                ticket: timer.ticket
            }]
        );
        assert!(fire(&mut state, &mut interaction, timer).is_empty());
        assert!(!state.windows[0].minimized);
    }

    #[test]
    fn taskbar_toggle_minimizes_if_focused_and_restores_if_minimized() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let first = open(&mut state, &mut interaction, "notepad");
        let second = open(&mut state, &mut interaction, "notepad");

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleTaskbarWindow { window_id: second },
        )
        .expect("toggle");
        fire(&mut state, &mut interaction, scheduled(&effects)[0]);
        assert!(state.window(second).expect("window").minimized);
        assert_eq!(state.focused_window_id(), Some(first));

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleTaskbarWindow { window_id: second },
        )
        .expect("toggle");
        assert!(!state.window(second).expect("window").minimized);
        assert_eq!(state.focused_window_id(), Some(second));
        assert!(effects.contains(&RuntimeEffect::Notify(WindowEvent::Restored {
            window_id: second
        })));

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleTaskbarWindow { window_id: first },
        )
        .expect("toggle");
        assert_eq!(state.focused_window_id(), Some(first));
    }

    #[test]
    fn focusing_already_focused_top_window_is_a_noop() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "notepad");
        let z_before = state.windows[0].z_index;

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::FocusWindow { window_id: id },
        )
        .expect("focus");
        assert!(effects.is_empty());
        assert_eq!(state.windows[0].z_index, z_before);
    }

    #[test]
    fn unknown_windows_are_reported() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        assert_eq!(
            reduce_desktop(
                &mut state,
                &mut interaction,
                DesktopAction::FocusWindow {
                    window_id: WindowId(9)
                },
            ),
            Err(ReducerError::WindowNotFound(WindowId(9)))
        );
    }

    #[test]
    fn maximize_then_restore_returns_to_the_original_bounds() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "notepad");
        let original = state.windows[0].rect;

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleMaximize { window_id: id },
        )
        .expect("maximize");
        assert_eq!(state.windows[0].rect, state.work_area());
        assert_eq!(state.windows[0].restore_rect, Some(original));

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleMaximize { window_id: id },
        )
        .expect("restore");
        assert_eq!(state.windows[0].rect, original);
        assert_eq!(state.windows[0].restore_rect, None);
        assert!(!state.windows[0].maximized);
    }

    #[test]
    fn snap_then_maximize_then_restore_returns_to_pre_snap_bounds() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "notepad");
        let original = state.windows[0].rect;

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::SnapWindow {
                window_id: id,
                zone: SnapZone::LeftHalf,
            },
        )
        .expect("snap");
        assert!(state.windows[0].is_snapped());
        assert!(!state.windows[0].maximized);
        assert_eq!(state.windows[0].rect.w, 512);

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MaximizeWindow { window_id: id },
        )
        .expect("maximize");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::RestoreFromMaximize { window_id: id },
        )
        .expect("restore");
        assert_eq!(state.windows[0].rect, original);
    }

    #[test]
    fn drag_below_threshold_is_a_click() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "notepad");
        let before = state.windows[0].rect;

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::PointerDown {
                window_id: id,
                region: WindowRegion::TitleBar,
                pointer: at(300, 70),
            },
        )
        .expect("down");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::PointerMove {
                pointer: at(304, 66),
            },
        )
        .expect("move");
        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::PointerUp {
                pointer: at(304, 66),
            },
        )
        .expect("up");

        assert_eq!(state.windows[0].rect, before);
        assert_eq!(effects, vec![RuntimeEffect::PersistGeometry]);
        assert!(interaction.session.is_idle());
    }

    #[test]
    fn drag_clamps_top_edge_and_previews_snap_zone() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "notepad");

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::PointerDown {
                window_id: id,
                region: WindowRegion::TitleBar,
                pointer: at(300, 70),
            },
        )
        .expect("down");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::PointerMove { pointer: at(400, 5) },
        )
        .expect("move");

        assert_eq!(state.windows[0].rect.x, 212);
        assert_eq!(state.windows[0].rect.y, 0);
        assert_eq!(interaction.snap_preview(), Some(SnapZone::Maximize));

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::PointerMove {
                pointer: at(400, 200),
            },
        )
        .expect("move");
        assert_eq!(interaction.snap_preview(), None);
    }

    #[test]
    fn releasing_at_the_left_edge_snaps_to_the_left_half() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "notepad");

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::PointerDown {
                window_id: id,
                region: WindowRegion::TitleBar,
                pointer: at(300, 70),
            },
        )
        .expect("down");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::PointerMove { pointer: at(4, 300) },
        )
        .expect("move");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::PointerUp { pointer: at(4, 300) },
        )
        .expect("up");

        let window = &state.windows[0];
        assert_eq!(
            window.rect,
            WindowRect {
                x: 0,
                y: 0,
                w: 512,
                h: 708
            }
        );
        assert!(!window.maximized);
        assert_eq!(
            window.restore_rect,
            Some(WindowRect {
                x: -184,
                y: 284,
                w: 800,
                h: 600
            })
        );
        assert_eq!(interaction.snap_preview(), None);
    }

    #[test]
    fn maximized_windows_cannot_be_dragged_or_resized() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "notepad");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MaximizeWindow { window_id: id },
        )
        .expect("maximize");

        for region in [
            WindowRegion::TitleBar,
            WindowRegion::Resize(ResizeEdge::SouthEast),
        ] {
            reduce_desktop(
                &mut state,
                &mut interaction,
                DesktopAction::PointerDown {
                    window_id: id,
                    region,
                    pointer: at(500, 10),
                },
            )
            .expect("down");
            assert!(interaction.session.is_idle());
        }
    }

    #[test]
    fn resize_from_the_west_edge_keeps_the_east_edge_anchored() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "notepad");
        let start = state.windows[0].rect;

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::PointerDown {
                window_id: id,
                region: WindowRegion::Resize(ResizeEdge::West),
                pointer: at(start.x, 300),
            },
        )
        .expect("down");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::PointerMove {
                pointer: at(start.x + 900, 300),
            },
        )
        .expect("move");

        let rect = state.windows[0].rect;
        assert_eq!(rect.w, 300);
        assert_eq!(rect.x + rect.w, start.x + start.w);
        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::PointerUp {
                pointer: at(start.x + 900, 300),
            },
        )
        .expect("up");
        assert_eq!(effects, vec![RuntimeEffect::PersistGeometry]);
    }

    #[test]
    fn a_second_press_does_not_replace_the_active_session() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let first = open(&mut state, &mut interaction, "notepad");
        let second = open(&mut state, &mut interaction, "notepad");

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::PointerDown {
                window_id: first,
                region: WindowRegion::TitleBar,
                pointer: at(200, 60),
            },
        )
        .expect("down");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::PointerDown {
                window_id: second,
                region: WindowRegion::Resize(ResizeEdge::East),
                pointer: at(900, 300),
            },
        )
        .expect("down");

        assert_eq!(interaction.session.window_id(), Some(first));
    }

    #[test]
    fn screen_resize_refits_maximized_windows() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "notepad");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MaximizeWindow { window_id: id },
        )
        .expect("maximize");

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::SetScreenSize {
                screen: ScreenSize {
                    width: 1920,
                    height: 1080,
                },
            },
        )
        .expect("resize");
        assert_eq!(effects, vec![RuntimeEffect::PersistGeometry]);
        assert_eq!(
            state.windows[0].rect,
            WindowRect {
                x: 0,
                y: 0,
                w: 1920,
                h: 1020
            }
        );
    }

    #[test]
    fn switcher_cycles_and_confirm_cancels_the_timeout() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let first = open(&mut state, &mut interaction, "notepad");
        let second = open(&mut state, &mut interaction, "browser");

        let shown = reduce_desktop(&mut state, &mut interaction, DesktopAction::ShowSwitcher)
            .expect("show");
        let timer = scheduled(&shown)[0];
        assert_eq!(timer.delay_ms, 3_000);
        assert_eq!(
            interaction
                .switcher
                .as_ref()
                .and_then(|overlay| overlay.selected_window()),
            Some(first)
        );

        reduce_desktop(&mut state, &mut interaction, DesktopAction::ShowSwitcher).expect("next");
        reduce_desktop(&mut state, &mut interaction, DesktopAction::ShowSwitcher).expect("wrap");
        let confirmed = reduce_desktop(&mut state, &mut interaction, DesktopAction::ConfirmSwitcher)
            .expect("confirm");

        assert!(interaction.switcher.is_none());
        assert!(confirmed.contains(&RuntimeEffect::CancelTimer {
            ticket: timer.ticket
        }));
        assert_eq!(state.focused_window_id(), Some(first));
        assert!(fire(&mut state, &mut interaction, timer).is_empty());
        assert_ne!(state.focused_window_id(), Some(second));
    }

    #[test]
    fn switcher_timeout_confirms_the_selection() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let first = open(&mut state, &mut interaction, "notepad");
        open(&mut state, &mut interaction, "browser");

        let shown = reduce_desktop(&mut state, &mut interaction, DesktopAction::ShowSwitcher)
            .expect("show");
        fire(&mut state, &mut interaction, scheduled(&shown)[0]);

        assert!(interaction.switcher.is_none());
        assert_eq!(state.focused_window_id(), Some(first));
    }

    #[test]
    fn switcher_with_no_windows_stays_closed() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let effects = reduce_desktop(&mut state, &mut interaction, DesktopAction::ShowSwitcher)
            .expect("show");
        assert!(effects.is_empty());
        assert!(interaction.switcher.is_none());
    }

    #[test]
    fn close_focused_window_targets_the_focused_window() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        open(&mut state, &mut interaction, "notepad");
        let second = open(&mut state, &mut interaction, "notepad");

        reduce_desktop(&mut state, &mut interaction, DesktopAction::CloseFocusedWindow)
            .expect("close");
        assert!(state.window(second).is_some_and(WindowRecord::is_closing));
    }

    #[test]
    fn closing_the_last_window_reports_no_focus() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let id = open(&mut state, &mut interaction, "notepad");
        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id: id },
        )
        .expect("close");

        let effects = fire(&mut state, &mut interaction, scheduled(&effects)[0]);
        assert!(effects.contains(&RuntimeEffect::Notify(WindowEvent::FocusChanged {
            window_id: None
        })));
    }
}
