//! Recursive file/folder node model.

use std::collections::BTreeMap;

use platform_host::join_virtual_path;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Restore metadata attached to a node while it sits in the recycle bin.
pub struct TrashInfo {
    /// Path the node had before it was soft-deleted.
    pub original_path: String,
    /// Deletion time in unix milliseconds.
    pub deleted_date: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Text file leaf.
pub struct FileNode {
    /// Segment name, unique among siblings.
    pub name: String,
    /// Canonical absolute path.
    pub path: String,
    /// File payload.
    #[serde(default)]
    pub content: String,
    /// UTF-8 byte length of `content`.
    #[serde(default)]
    pub size: u64,
    /// Creation time in unix milliseconds.
    #[serde(default)]
    pub created: u64,
    /// Last modification time in unix milliseconds.
    #[serde(default)]
    pub modified: u64,
    /// Present only for recycle bin entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trash: Option<TrashInfo>,
}

impl FileNode {
    /// Creates a file at `parent_path/name` stamped with `now`.
    pub fn new(name: &str, content: impl Into<String>, parent_path: &str, now: u64) -> Self {
        let content = content.into();
        Self {
            name: name.to_string(),
            path: join_virtual_path(parent_path, name),
            size: content.len() as u64,
            content,
            created: now,
            modified: now,
            trash: None,
        }
    }

    /// Replaces the content, refreshing `size` and `modified`.
    pub fn set_content(&mut self, content: impl Into<String>, now: u64) {
        self.content = content.into();
        self.size = self.content.len() as u64;
        self.modified = now;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Folder with children keyed by name.
pub struct FolderNode {
    /// Segment name, unique among siblings.
    pub name: String,
    /// Canonical absolute path.
    pub path: String,
    /// Direct children keyed by their `name`.
    #[serde(default)]
    pub children: BTreeMap<String, FsNode>,
    /// Creation time in unix milliseconds.
    #[serde(default)]
    pub created: u64,
    /// Last modification time in unix milliseconds.
    #[serde(default)]
    pub modified: u64,
    /// Hidden folders are left out of listings and search.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    /// Present only for recycle bin entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trash: Option<TrashInfo>,
}

impl FolderNode {
    /// Creates an empty folder at `parent_path/name` stamped with `now`.
    pub fn new(name: &str, parent_path: &str, now: u64) -> Self {
        Self {
            name: name.to_string(),
            path: join_virtual_path(parent_path, name),
            children: BTreeMap::new(),
            created: now,
            modified: now,
            hidden: false,
            trash: None,
        }
    }

    /// Inserts `node` keyed by its own name, replacing any previous entry.
    pub fn insert(&mut self, node: FsNode) {
        self.children.insert(node.name().to_string(), node);
    }

    /// Returns `true` when a child named `name` exists.
    pub fn has_child(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
/// A file or folder in the virtual tree.
///
/// `Clone` is the structural deep copy used by the clipboard.
pub enum FsNode {
    /// File leaf.
    File(FileNode),
    /// Folder branch.
    Folder(FolderNode),
}

impl FsNode {
    pub fn name(&self) -> &str {
        match self {
            Self::File(file) => &file.name,
            Self::Folder(folder) => &folder.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::File(file) => &file.path,
            Self::Folder(folder) => &folder.path,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Folder(folder) if folder.hidden)
    }

    pub fn created(&self) -> u64 {
        match self {
            Self::File(file) => file.created,
            Self::Folder(folder) => folder.created,
        }
    }

    pub fn modified(&self) -> u64 {
        match self {
            Self::File(file) => file.modified,
            Self::Folder(folder) => folder.modified,
        }
    }

    /// Byte size for files, `0` for folders.
    pub fn size(&self) -> u64 {
        match self {
            Self::File(file) => file.size,
            Self::Folder(_) => 0,
        }
    }

    pub fn trash(&self) -> Option<&TrashInfo> {
        match self {
            Self::File(file) => file.trash.as_ref(),
            Self::Folder(folder) => folder.trash.as_ref(),
        }
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Self::File(file) => Some(file),
            Self::Folder(_) => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut FileNode> {
        match self {
            Self::File(file) => Some(file),
            Self::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&FolderNode> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::File(_) => None,
        }
    }

    pub fn as_folder_mut(&mut self) -> Option<&mut FolderNode> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::File(_) => None,
        }
    }

    pub(crate) fn set_trash(&mut self, trash: Option<TrashInfo>) {
        match self {
            Self::File(file) => file.trash = trash,
            Self::Folder(folder) => folder.trash = trash,
        }
    }

    pub(crate) fn set_created(&mut self, now: u64) {
        match self {
            Self::File(file) => file.created = now,
            Self::Folder(folder) => folder.created = now,
        }
    }

    pub(crate) fn touch(&mut self, now: u64) {
        match self {
            Self::File(file) => file.modified = now,
            Self::Folder(folder) => folder.modified = now,
        }
    }

    /// Renames the node and moves it under `parent_path`, rewriting every descendant path.
    pub(crate) fn place(&mut self, name: &str, parent_path: &str) {
        match self {
            Self::File(file) => file.name = name.to_string(),
            Self::Folder(folder) => folder.name = name.to_string(),
        }
        self.relocate(parent_path);
    }

    /// Recomputes this node's path under `parent_path` and cascades it to all descendants.
    pub fn relocate(&mut self, parent_path: &str) {
        let path = join_virtual_path(parent_path, self.name());
        match self {
            Self::File(file) => file.path = path,
            Self::Folder(folder) => {
                for child in folder.children.values_mut() {
                    child.relocate(&path);
                }
                folder.path = path;
            }
        }
    }

    /// Visits every descendant depth-first in name order, skipping hidden folders entirely.
    pub(crate) fn walk_visible<'a>(&'a self, visit: &mut impl FnMut(&'a FsNode)) {
        let Self::Folder(folder) = self else {
            return;
        };
        for child in folder.children.values() {
            if child.is_hidden() {
                continue;
            }
            visit(child);
            child.walk_visible(visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn nested() -> FsNode {
        let mut inner = FolderNode::new("inner", "/Work", 1);
        inner.insert(FsNode::File(FileNode::new("deep.txt", "x", "/Work/inner", 1)));
        let mut work = FolderNode::new("Work", "/", 1);
        work.insert(FsNode::Folder(inner));
        work.insert(FsNode::File(FileNode::new("top.md", "# hi", "/Work", 1)));
        FsNode::Folder(work)
    }

    fn collect_paths(node: &FsNode) -> Vec<String> {
        let mut out = vec![node.path().to_string()];
        node.walk_visible(&mut |child| out.push(child.path().to_string()));
        out
    }

    #[test]
    fn file_size_is_utf8_byte_length() {
        let mut file = FileNode::new("é.txt", "héllo", "/", 5);
        assert_eq!(file.size, 6);
        file.set_content("", 9);
        assert_eq!((file.size, file.modified, file.created), (0, 9, 5));
    }

    #[test]
    fn relocate_cascades_to_descendants() {
        let mut node = nested();
        node.place("Archive", "/Documents");
        assert_eq!(
            collect_paths(&node),
            vec![
                "/Documents/Archive",
                "/Documents/Archive/inner",
                "/Documents/Archive/inner/deep.txt",
                "/Documents/Archive/top.md",
            ]
        );
    }

    #[test]
    fn clone_is_independent_of_the_source() {
        let original = nested();
        let mut copy = original.clone();
        copy.place("Copy", "/");
        assert_eq!(original.path(), "/Work");
        assert_eq!(copy.path(), "/Copy");
    }

    #[test]
    fn serialized_shape_is_tagged_by_type() {
        let node = FsNode::File(FileNode::new("a.txt", "hi", "/Documents", 3));
        let value = serde_json::to_value(&node).expect("serialize");
        assert_eq!(value["type"], "file");
        assert_eq!(value["path"], "/Documents/a.txt");
        assert!(value.get("trash").is_none());

        let back: FsNode = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, node);
    }

    #[test]
    fn hidden_folders_are_skipped_by_walk() {
        let mut root = FolderNode::new("root", "/", 0);
        root.path = "/".to_string();
        let mut bin = FolderNode::new("RecycleBin", "/", 0);
        bin.hidden = true;
        bin.insert(FsNode::File(FileNode::new("gone.txt", "", "/RecycleBin", 0)));
        root.insert(FsNode::Folder(bin));
        root.insert(FsNode::Folder(FolderNode::new("Music", "/", 0)));

        assert_eq!(collect_paths(&FsNode::Folder(root)), vec!["/", "/Music"]);
    }
}
