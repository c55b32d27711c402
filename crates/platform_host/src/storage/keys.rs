//! Store keys shared by the desktop runtime and its persistence adapters.

/// Full virtual filesystem tree, rewritten wholesale on every mutation.
pub const FILESYSTEM_KEY: &str = "filesystem";
/// Per-window geometry map keyed by window id.
pub const WINDOW_STATES_KEY: &str = "window_states";
/// Shell settings (theme, accent colour, wallpaper, user name).
pub const SETTINGS_KEY: &str = "settings";
/// Desktop icon grid layout.
pub const DESKTOP_ICONS_KEY: &str = "desktop_icons";
/// Start-menu pinned applications.
pub const PINNED_APPS_KEY: &str = "pinned_apps";
/// Recently launched applications, most recent first.
pub const RECENT_APPS_KEY: &str = "recent_apps";
/// Notification centre history, newest first.
pub const NOTIFICATIONS_KEY: &str = "notifications";
