//! Desktop window manager runtime.
//!
//! The core is a pure reducer ([`reduce_desktop`]) over [`DesktopState`] that returns
//! [`RuntimeEffect`]s instead of touching the host. [`WindowManager`] executes those effects
//! (geometry persistence, chrome notification, transition timers), and [`DesktopProvider`] wires
//! it into a Leptos application together with the virtual file system.

pub mod chrome;
pub mod config;
pub mod manager;
pub mod model;
pub mod persistence;
pub mod preferences;
pub mod reducer;
pub mod runtime_context;
pub mod shortcuts;
pub mod switcher;
pub mod window_manager;

pub use chrome::{TaskbarIndex, WindowEvent, WindowObserver};
pub use config::{ScreenSize, WindowManagerConfig};
pub use manager::WindowManager;
pub use model::*;
pub use persistence::{
    load_window_geometry, persist_window_geometry, WindowGeometry, WindowGeometryMap,
};
pub use preferences::{
    AppShortcut, DesktopIcon, DesktopSettings, Notification, RecentApp, ShellPreferences,
};
pub use reducer::{
    reduce_desktop, DesktopAction, ReducerError, RuntimeEffect, ScheduledTimer, TimerKind,
};
pub use runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};
pub use shortcuts::{KeyPhase, KeyStroke};
