//! Runtime provider and context wiring for the desktop shell.
//!
//! This module is the composition root: it builds the key-value store, the [`WindowManager`],
//! the [`VirtualFileSystem`] and the shell preferences once, hands them to descendant components
//! through [`DesktopRuntimeContext`], and connects them to the browser (viewport size, global
//! pointer and keyboard listeners, transition timers).
#![allow(clippy::clone_on_copy)]

use std::{rc::Rc, time::Duration};

use desktop_fs::VirtualFileSystem;
use leptos::*;
use platform_host::KeyValueStore;

use crate::{
    chrome::TaskbarIndex,
    config::{ScreenSize, WindowManagerConfig},
    manager::WindowManager,
    model::{DesktopState, InteractionState, PointerPosition},
    preferences::ShellPreferences,
    reducer::{DesktopAction, ScheduledTimer},
    shortcuts::KeyStroke,
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop state and driving the window manager.
pub struct DesktopRuntimeContext {
    /// Window manager service.
    pub manager: StoredValue<WindowManager>,
    /// Virtual file system shared by every application window.
    pub fs: StoredValue<VirtualFileSystem>,
    /// Shell preference storage.
    pub preferences: StoredValue<ShellPreferences>,
    /// Reactive mirror of the window manager state.
    pub state: RwSignal<DesktopState>,
    /// Reactive mirror of the pointer session and switcher overlay.
    pub interaction: RwSignal<InteractionState>,
    /// Reactive mirror of the taskbar grouping.
    pub taskbar: RwSignal<TaskbarIndex>,
    /// Bumped after every file system mutation made through [`DesktopRuntimeContext::update_fs`].
    pub fs_revision: RwSignal<u64>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action, mirrors the resulting state, and arms requested timers.
    pub fn dispatch_action(self, action: DesktopAction) {
        self.with_manager(|manager| {
            manager.dispatch(action);
        });
    }

    /// Opens an application window.
    pub fn open_app(self, app_name: &str, app_data: serde_json::Value) {
        let app_name = app_name.to_string();
        self.with_manager(move |manager| {
            manager.open_app(&app_name, app_data);
        });
    }

    /// Runs `f` against the window manager, then syncs signals and timers.
    pub fn with_manager(self, f: impl FnOnce(&mut WindowManager)) {
        let armed = self
            .manager
            .try_update_value(|manager| {
                f(manager);
                manager.take_armed_timers()
            })
            .unwrap_or_default();
        self.sync();
        arm_timers(self, armed);
    }

    /// Runs a file system operation and notifies dependants.
    pub fn update_fs<T>(self, f: impl FnOnce(&mut VirtualFileSystem) -> T) -> Option<T> {
        let result = self.fs.try_update_value(f);
        self.fs_revision.update(|revision| *revision += 1);
        result
    }

    fn fire_timer(self, ticket: u64) {
        self.with_manager(|manager| {
            manager.fire_timer(ticket);
        });
    }

    fn sync(self) {
        self.manager.try_with_value(|manager| {
            if self.state.with_untracked(|state| state != manager.state()) {
                self.state.set(manager.state().clone());
            }
            if self
                .interaction
                .with_untracked(|interaction| interaction != manager.interaction())
            {
                self.interaction.set(manager.interaction().clone());
            }
            if self
                .taskbar
                .with_untracked(|taskbar| taskbar != manager.taskbar())
            {
                self.taskbar.set(manager.taskbar().clone());
            }
        });
    }
}

fn arm_timers(runtime: DesktopRuntimeContext, timers: Vec<ScheduledTimer>) {
    for timer in timers {
        let ticket = timer.ticket;
        set_timeout(
            move || runtime.fire_timer(ticket),
            Duration::from_millis(u64::from(timer.delay_ms)),
        );
    }
}

fn viewport_size() -> Option<ScreenSize> {
    let window = window();
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some(ScreenSize {
        width: width as i32,
        height: height as i32,
    })
}

fn install_host_listeners(runtime: DesktopRuntimeContext) {
    let resize = window_event_listener(ev::resize, move |_| {
        if let Some(screen) = viewport_size() {
            runtime.with_manager(|manager| manager.set_screen_size(screen));
        }
    });

    let pointer_move =
        window_event_listener(ev::mousemove, move |event: web_sys::MouseEvent| {
            if runtime.interaction.with_untracked(|i| i.session.is_idle()) {
                return;
            }
            let pointer = PointerPosition {
                x: event.client_x(),
                y: event.client_y(),
            };
            runtime.with_manager(|manager| manager.pointer_move(pointer));
        });

    let pointer_up =
        window_event_listener(ev::mouseup, move |event: web_sys::MouseEvent| {
            if runtime.interaction.with_untracked(|i| i.session.is_idle()) {
                return;
            }
            let pointer = PointerPosition {
                x: event.client_x(),
                y: event.client_y(),
            };
            runtime.with_manager(|manager| manager.pointer_up(pointer));
        });

    let key_down =
        window_event_listener(ev::keydown, move |event: web_sys::KeyboardEvent| {
            let key = event.key();
            let mut claimed = false;
            runtime.with_manager(|manager| {
                claimed = manager.handle_key(KeyStroke::down(&key, event.alt_key()));
            });
            if claimed {
                event.prevent_default();
            }
        });

    let key_up =
        window_event_listener(ev::keyup, move |event: web_sys::KeyboardEvent| {
            let key = event.key();
            runtime.with_manager(|manager| {
                manager.handle_key(KeyStroke::up(&key, event.alt_key()));
            });
        });

    on_cleanup(move || {
        resize.remove();
        pointer_move.remove();
        pointer_up.remove();
        key_down.remove();
        key_up.remove();
    });
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components.
pub fn DesktopProvider(
    /// Window-manager tuning; defaults apply when omitted.
    #[prop(optional)]
    config: Option<WindowManagerConfig>,
    children: Children,
) -> impl IntoView {
    let store: Rc<dyn KeyValueStore> = Rc::new(platform_host_web::key_value_store());
    let mut manager = WindowManager::with_config(store.clone(), config.unwrap_or_default());
    if let Some(screen) = viewport_size() {
        manager.set_screen_size(screen);
    }
    let fs = VirtualFileSystem::load(store.clone());
    let preferences = ShellPreferences::new(store);

    let runtime = DesktopRuntimeContext {
        state: create_rw_signal(manager.state().clone()),
        interaction: create_rw_signal(manager.interaction().clone()),
        taskbar: create_rw_signal(manager.taskbar().clone()),
        fs_revision: create_rw_signal(0),
        manager: store_value(manager),
        fs: store_value(fs),
        preferences: store_value(preferences),
    };

    provide_context(runtime.clone());
    install_host_listeners(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
