//! Presentation helpers consumed by explorer-style views.

use serde::{Deserialize, Serialize};

use crate::{names::split_extension, node::FsNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Coarse content category derived from a node's extension.
pub enum FileKind {
    Folder,
    Text,
    Document,
    Pdf,
    Image,
    Audio,
    Video,
    Web,
    Stylesheet,
    Script,
    Archive,
    Other,
}

impl FileKind {
    /// Classifies a node. Extensions are matched case-insensitively.
    pub fn of(node: &FsNode) -> Self {
        if node.is_folder() {
            return Self::Folder;
        }
        let Some(ext) = split_extension(node.name()).1 else {
            return Self::Other;
        };
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Self::Text,
            "doc" | "docx" => Self::Document,
            "pdf" => Self::Pdf,
            "jpg" | "jpeg" | "png" | "gif" => Self::Image,
            "mp3" | "wav" => Self::Audio,
            "mp4" | "avi" => Self::Video,
            "html" => Self::Web,
            "css" => Self::Stylesheet,
            "js" => Self::Script,
            "zip" | "rar" => Self::Archive,
            _ => Self::Other,
        }
    }

    /// Icon id used by the shell icon set.
    pub fn icon_id(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Text => "file-text",
            Self::Document | Self::Other => "file",
            Self::Pdf => "file-pdf",
            Self::Image => "image",
            Self::Audio => "music",
            Self::Video => "video",
            Self::Web => "globe",
            Self::Stylesheet => "palette",
            Self::Script => "code",
            Self::Archive => "archive",
        }
    }
}

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Formats a byte count with binary units and at most two decimals (`1.5 KB`).
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < SIZE_UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}
