//! Window-manager tuning knobs and host screen metrics.

use serde::{Deserialize, Serialize};

use crate::model::WindowRect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Geometry and timing constants used by the window manager.
pub struct WindowManagerConfig {
    /// Width given to newly opened windows.
    pub default_width: i32,
    /// Height given to newly opened windows.
    pub default_height: i32,
    /// Diagonal offset per already-open window when cascading new windows.
    pub cascade_offset: i32,
    /// Smallest width a resize may produce.
    pub min_width: i32,
    /// Smallest height a resize may produce.
    pub min_height: i32,
    /// Pointer travel (px, either axis) before a title-bar press becomes a drag.
    pub drag_threshold: i32,
    /// Distance from a screen edge (px) that arms a snap zone.
    pub snap_threshold: i32,
    /// Height reserved for the taskbar at the bottom of the screen.
    pub taskbar_height: i32,
    /// Duration of the minimize and close transitions.
    pub transition_ms: u32,
    /// Time after which an untouched window switcher confirms itself.
    pub switcher_timeout_ms: u32,
}

impl Default for WindowManagerConfig {
    fn default() -> Self {
        Self {
            default_width: 800,
            default_height: 600,
            cascade_offset: 30,
            min_width: 300,
            min_height: 200,
            drag_threshold: 5,
            snap_threshold: 10,
            taskbar_height: 60,
            transition_ms: 250,
            switcher_timeout_ms: 3_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Viewport size reported by the host.
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

impl ScreenSize {
    /// Area available to windows: the screen minus the taskbar strip.
    pub fn work_area(self, taskbar_height: i32) -> WindowRect {
        WindowRect {
            x: 0,
            y: 0,
            w: self.width,
            h: (self.height - taskbar_height).max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config: WindowManagerConfig =
            serde_json::from_str(r#"{"taskbar_height": 48}"#).expect("config");
        assert_eq!(config.taskbar_height, 48);
        assert_eq!(config.min_width, 300);
        assert_eq!(config.switcher_timeout_ms, 3_000);
    }

    #[test]
    fn work_area_excludes_taskbar() {
        let area = ScreenSize::default().work_area(60);
        assert_eq!(
            area,
            WindowRect {
                x: 0,
                y: 0,
                w: 1024,
                h: 708
            }
        );
        assert_eq!(
            ScreenSize {
                width: 100,
                height: 20
            }
            .work_area(60)
            .h,
            0
        );
    }
}
