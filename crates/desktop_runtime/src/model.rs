use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{ScreenSize, WindowManagerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    /// Parses a resize handle name (`n`, `se`, ...).
    pub fn from_handle(handle: &str) -> Option<Self> {
        Some(match handle {
            "n" => Self::North,
            "s" => Self::South,
            "e" => Self::East,
            "w" => Self::West,
            "ne" => Self::NorthEast,
            "nw" => Self::NorthWest,
            "se" => Self::SouthEast,
            "sw" => Self::SouthWest,
            _ => return None,
        })
    }

    pub fn handle(self) -> &'static str {
        match self {
            Self::North => "n",
            Self::South => "s",
            Self::East => "e",
            Self::West => "w",
            Self::NorthEast => "ne",
            Self::NorthWest => "nw",
            Self::SouthEast => "se",
            Self::SouthWest => "sw",
        }
    }

    pub fn moves_north(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    pub fn moves_south(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    pub fn moves_east(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    pub fn moves_west(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Part of a window's chrome that received a pointer press.
pub enum WindowRegion {
    /// Header strip outside the control buttons; starts a drag.
    TitleBar,
    /// Minimize/maximize/close buttons.
    Controls,
    /// Application content.
    Content,
    /// Edge or corner resize handle.
    Resize(ResizeEdge),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Screen-edge docking target for a dragged window.
pub enum SnapZone {
    LeftHalf,
    RightHalf,
    Maximize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    Normal,
    Minimized,
    Maximized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Presentational transition that completes after a delay.
pub enum TransitionKind {
    Minimize,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// A scheduled transition; only the ticket currently stored on the window may complete it.
pub struct PendingTransition {
    pub ticket: u64,
    pub kind: TransitionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_name: String,
    /// Opaque launch payload handed to the application; only `name`, `icon`, and `id` are read.
    pub app_data: Value,
    pub title: String,
    pub icon: Option<String>,
    /// Taskbar grouping key: `app_data.id`, falling back to `app_name`.
    pub app_key: String,
    pub rect: WindowRect,
    /// Bounds to return to after a maximize or snap.
    pub restore_rect: Option<WindowRect>,
    pub z_index: u32,
    pub is_focused: bool,
    pub minimized: bool,
    pub maximized: bool,
    pub pending: Option<PendingTransition>,
}

impl WindowRecord {
    pub fn state(&self) -> WindowState {
        if self.minimized {
            WindowState::Minimized
        } else if self.maximized {
            WindowState::Maximized
        } else {
            WindowState::Normal
        }
    }

    pub fn is_closing(&self) -> bool {
        matches!(
            self.pending,
            Some(PendingTransition {
                kind: TransitionKind::Close,
                ..
            })
        )
    }

    pub fn is_minimizing(&self) -> bool {
        matches!(
            self.pending,
            Some(PendingTransition {
                kind: TransitionKind::Minimize,
                ..
            })
        )
    }

    /// Half-screen snapped: remembered bounds without the maximized flag.
    pub fn is_snapped(&self) -> bool {
        !self.maximized && self.restore_rect.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Application launch request as issued by the desktop chrome.
pub struct OpenWindowRequest {
    pub app_name: String,
    pub app_data: Value,
}

impl OpenWindowRequest {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            app_data: Value::Object(Default::default()),
        }
    }

    pub fn with_data(app_name: impl Into<String>, app_data: Value) -> Self {
        Self {
            app_name: app_name.into(),
            app_data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopState {
    pub next_window_id: u64,
    pub next_z_index: u32,
    pub next_ticket: u64,
    /// Live windows in opening order. Stacking is carried by `z_index`, never by position.
    pub windows: Vec<WindowRecord>,
    pub screen: ScreenSize,
    pub config: WindowManagerConfig,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::with_config(WindowManagerConfig::default())
    }
}

impl DesktopState {
    pub fn with_config(config: WindowManagerConfig) -> Self {
        Self {
            next_window_id: 1,
            next_z_index: 1,
            next_ticket: 1,
            windows: Vec::new(),
            screen: ScreenSize::default(),
            config,
        }
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.windows.iter().find(|w| w.is_focused).map(|w| w.id)
    }

    /// Usable screen region for maximized and snapped windows.
    pub fn work_area(&self) -> WindowRect {
        self.screen.work_area(self.config.taskbar_height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
    /// Set once the pointer has travelled past the drag threshold.
    pub moved: bool,
    pub snap_preview: Option<SnapZone>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// The single active pointer gesture.
pub enum InteractionSession {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeSession),
}

impl InteractionSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn window_id(&self) -> Option<WindowId> {
        match self {
            Self::Idle => None,
            Self::Dragging(session) => Some(session.window_id),
            Self::Resizing(session) => Some(session.window_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Open Alt+Tab overlay.
pub struct SwitcherOverlay {
    pub entries: Vec<WindowId>,
    pub selected: usize,
    /// Ticket of the auto-dismiss timer armed when the overlay opened.
    pub ticket: u64,
}

impl SwitcherOverlay {
    pub fn selected_window(&self) -> Option<WindowId> {
        self.entries.get(self.selected).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub session: InteractionSession,
    pub switcher: Option<SwitcherOverlay>,
}

impl InteractionState {
    /// Snap zone currently previewed by an active drag.
    pub fn snap_preview(&self) -> Option<SnapZone> {
        match &self.session {
            InteractionSession::Dragging(session) => session.snap_preview,
            _ => None,
        }
    }
}
