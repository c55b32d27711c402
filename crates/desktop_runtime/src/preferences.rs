//! Shell preferences persisted next to the window layout: settings, desktop icon grid, start-menu
//! pinned and recent apps, and the notification history.

use std::rc::Rc;

use leptos::logging::warn;
use platform_host::{
    load_versioned_with, next_monotonic_timestamp_ms, save_versioned_with, unix_time_ms_now,
    KeyValueStore, DESKTOP_ICONS_KEY, NOTIFICATIONS_KEY, PINNED_APPS_KEY, RECENT_APPS_KEY,
    SETTINGS_KEY,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Schema version shared by every preference payload.
pub const PREFERENCES_SCHEMA_VERSION: u32 = 1;
/// Recent-app list length.
pub const MAX_RECENT_APPS: usize = 10;
/// Notification history length.
pub const MAX_NOTIFICATIONS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// User-facing shell settings.
pub struct DesktopSettings {
    pub theme: ThemeMode,
    pub accent_color: String,
    pub wallpaper: String,
    pub username: String,
    pub language: String,
    pub notifications: bool,
    pub animations: bool,
    pub font_size: FontSize,
}

impl Default for DesktopSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Light,
            accent_color: "#0078d4".to_string(),
            wallpaper: "default".to_string(),
            username: "User".to_string(),
            language: "en".to_string(),
            notifications: true,
            animations: true,
            font_size: FontSize::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Launchable application entry as shown by the desktop, start menu and taskbar.
pub struct AppShortcut {
    pub id: String,
    pub name: String,
    pub icon: String,
    /// Application passed to `open_app`.
    pub app: String,
}

impl AppShortcut {
    pub fn new(id: &str, name: &str, icon: &str, app: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            app: app.to_string(),
        }
    }

    /// Launch payload handed to the window manager (`id`, `name`, `icon`).
    pub fn app_data(&self) -> serde_json::Value {
        serde_json::json!({ "id": self.id, "name": self.name, "icon": self.icon })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Desktop icon placed on the grid (`x` is the column, `y` the row).
pub struct DesktopIcon {
    #[serde(flatten)]
    pub shortcut: AppShortcut,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentApp {
    #[serde(flatten)]
    pub shortcut: AppShortcut,
    /// Launch time in unix milliseconds.
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub timestamp: u64,
    pub title: String,
    pub message: String,
}

fn builtin_shortcuts() -> Vec<AppShortcut> {
    vec![
        AppShortcut::new("notepad", "Notepad", "📝", "notepad"),
        AppShortcut::new("explorer", "File Explorer", "📁", "fileexplorer"),
        AppShortcut::new("browser", "Web Browser", "🌐", "browser"),
        AppShortcut::new("settings", "Settings", "⚙️", "settings"),
        AppShortcut::new("gallery", "Gallery", "🖼️", "gallery"),
        AppShortcut::new("calendar", "Calendar", "🗓️", "calendar"),
        AppShortcut::new("recyclebin", "Recycle Bin", "🗑️", "recyclebin"),
    ]
}

/// Icon grid used until the user rearranges it: four rows in the first column, the rest in the
/// second.
pub fn default_desktop_icons() -> Vec<DesktopIcon> {
    builtin_shortcuts()
        .into_iter()
        .enumerate()
        .map(|(index, shortcut)| DesktopIcon {
            shortcut,
            x: if index < 4 { 0 } else { 1 },
            y: if index < 4 { index as u32 } else { index as u32 - 4 },
        })
        .collect()
}

pub fn default_pinned_apps() -> Vec<AppShortcut> {
    builtin_shortcuts()
        .into_iter()
        .filter(|shortcut| shortcut.id != "recyclebin")
        .collect()
}

/// Typed access to the shell preference keys of a [`KeyValueStore`].
///
/// Reads fall back to defaults when a key is missing or unreadable; write failures are logged
/// and returned.
#[derive(Clone)]
pub struct ShellPreferences {
    store: Rc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ShellPreferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellPreferences").finish_non_exhaustive()
    }
}

impl ShellPreferences {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn settings(&self) -> DesktopSettings {
        self.load_or(SETTINGS_KEY, DesktopSettings::default)
    }

    pub fn save_settings(&self, settings: &DesktopSettings) -> Result<(), String> {
        self.save(SETTINGS_KEY, settings)
    }

    pub fn desktop_icons(&self) -> Vec<DesktopIcon> {
        self.load_or(DESKTOP_ICONS_KEY, default_desktop_icons)
    }

    pub fn save_desktop_icons(&self, icons: &[DesktopIcon]) -> Result<(), String> {
        self.save(DESKTOP_ICONS_KEY, &icons)
    }

    pub fn pinned_apps(&self) -> Vec<AppShortcut> {
        self.load_or(PINNED_APPS_KEY, default_pinned_apps)
    }

    pub fn save_pinned_apps(&self, apps: &[AppShortcut]) -> Result<(), String> {
        self.save(PINNED_APPS_KEY, &apps)
    }

    pub fn recent_apps(&self) -> Vec<RecentApp> {
        self.load_or(RECENT_APPS_KEY, Vec::new)
    }

    /// Moves `shortcut` to the front of the recent list, dropping older duplicates and anything
    /// past [`MAX_RECENT_APPS`].
    pub fn add_recent_app(&self, shortcut: AppShortcut) -> Result<(), String> {
        let mut recent = self.recent_apps();
        recent.retain(|entry| entry.shortcut.id != shortcut.id);
        recent.insert(
            0,
            RecentApp {
                shortcut,
                timestamp: unix_time_ms_now(),
            },
        );
        recent.truncate(MAX_RECENT_APPS);
        self.save(RECENT_APPS_KEY, &recent)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.load_or(NOTIFICATIONS_KEY, Vec::new)
    }

    /// Prepends a notification, keeping at most [`MAX_NOTIFICATIONS`].
    pub fn add_notification(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Notification, String> {
        let id = next_monotonic_timestamp_ms();
        let notification = Notification {
            id,
            timestamp: id,
            title: title.into(),
            message: message.into(),
        };
        let mut notifications = self.notifications();
        notifications.insert(0, notification.clone());
        notifications.truncate(MAX_NOTIFICATIONS);
        self.save(NOTIFICATIONS_KEY, &notifications)?;
        Ok(notification)
    }

    pub fn remove_notification(&self, id: u64) -> Result<(), String> {
        let mut notifications = self.notifications();
        notifications.retain(|notification| notification.id != id);
        self.save(NOTIFICATIONS_KEY, &notifications)
    }

    pub fn clear_notifications(&self) -> Result<(), String> {
        self.save(NOTIFICATIONS_KEY, &Vec::<Notification>::new())
    }

    fn load_or<T: DeserializeOwned>(&self, key: &str, default: impl FnOnce() -> T) -> T {
        let loaded =
            load_versioned_with(&*self.store, key, PREFERENCES_SCHEMA_VERSION, |version, _| {
                warn!("ignoring {key} stored with unsupported schema version {version}");
                Ok(None)
            });
        match loaded {
            Ok(Some(value)) => value,
            Ok(None) => default(),
            Err(err) => {
                warn!("{key} load failed; using defaults: {err}");
                default()
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), String> {
        save_versioned_with(&*self.store, key, PREFERENCES_SCHEMA_VERSION, value).map_err(|err| {
            warn!("{key} persist failed: {err}");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use platform_host::MemoryKeyValueStore;
    use pretty_assertions::assert_eq;

    use super::*;

    fn prefs() -> ShellPreferences {
        ShellPreferences::new(Rc::new(MemoryKeyValueStore::default()))
    }

    #[test]
    fn empty_store_yields_defaults() {
        let prefs = prefs();
        assert_eq!(prefs.settings(), DesktopSettings::default());
        assert_eq!(prefs.pinned_apps().len(), 6);

        let icons = prefs.desktop_icons();
        let placed = icons
            .iter()
            .map(|icon| (icon.shortcut.id.as_str(), icon.x, icon.y))
            .collect::<Vec<_>>();
        assert_eq!(
            placed,
            vec![
                ("notepad", 0, 0),
                ("explorer", 0, 1),
                ("browser", 0, 2),
                ("settings", 0, 3),
                ("gallery", 1, 0),
                ("calendar", 1, 1),
                ("recyclebin", 1, 2),
            ]
        );
        assert_eq!(icons[1].shortcut.app, "fileexplorer");
    }

    #[test]
    fn settings_serialize_with_camel_case_keys() {
        let value = serde_json::to_value(DesktopSettings::default()).expect("encode");
        assert_eq!(value["accentColor"], "#0078d4");
        assert_eq!(value["fontSize"], "medium");
        assert_eq!(value["theme"], "light");

        let partial: DesktopSettings =
            serde_json::from_str(r#"{"theme": "dark"}"#).expect("decode");
        assert_eq!(partial.theme, ThemeMode::Dark);
        assert_eq!(partial.username, "User");
    }

    #[test]
    fn settings_round_trip_through_the_store() {
        let prefs = prefs();
        let settings = DesktopSettings {
            username: "Ada".to_string(),
            animations: false,
            ..DesktopSettings::default()
        };
        prefs.save_settings(&settings).expect("save");
        assert_eq!(prefs.settings(), settings);
    }

    #[test]
    fn recent_apps_are_deduplicated_and_capped() {
        let prefs = prefs();
        for index in 0..12 {
            let id = format!("app{index}");
            prefs
                .add_recent_app(AppShortcut::new(&id, &id, "x", &id))
                .expect("add");
        }
        prefs
            .add_recent_app(AppShortcut::new("app5", "app5", "x", "app5"))
            .expect("add");

        let ids = prefs
            .recent_apps()
            .into_iter()
            .map(|entry| entry.shortcut.id)
            .collect::<Vec<_>>();
        assert_eq!(ids.len(), MAX_RECENT_APPS);
        assert_eq!(ids[0], "app5");
        assert_eq!(ids[1], "app11");
        assert_eq!(ids.iter().filter(|id| *id == "app5").count(), 1);
    }

    #[test]
    fn notifications_are_newest_first_and_removable() {
        let prefs = prefs();
        let first = prefs.add_notification("Saved", "notes.txt").expect("add");
        let second = prefs.add_notification("Deleted", "old.txt").expect("add");

        let titles = prefs
            .notifications()
            .into_iter()
            .map(|n| n.title)
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["Deleted", "Saved"]);
        assert!(second.id > first.id);

        prefs.remove_notification(second.id).expect("remove");
        assert_eq!(prefs.notifications(), vec![first]);
        prefs.clear_notifications().expect("clear");
        assert!(prefs.notifications().is_empty());
    }

    #[test]
    fn notification_history_is_capped() {
        let prefs = prefs();
        for index in 0..(MAX_NOTIFICATIONS + 5) {
            prefs
                .add_notification(format!("n{index}"), "")
                .expect("add");
        }
        let notifications = prefs.notifications();
        assert_eq!(notifications.len(), MAX_NOTIFICATIONS);
        assert_eq!(notifications[0].title, format!("n{}", MAX_NOTIFICATIONS + 4));
    }
}
