//! The virtual file system service: path-addressed CRUD, recycle bin, clipboard, and search over
//! a single persisted tree.
//!
//! Every successful mutation rewrites the whole tree to the store under [`FILESYSTEM_KEY`].
//! Persistence is best-effort: a failing store is logged and the in-memory tree stays
//! authoritative.

use std::rc::Rc;

use leptos::logging::warn;
use platform_host::{
    is_same_or_descendant, load_versioned_with, normalize_virtual_path, parent_virtual_path,
    next_monotonic_timestamp_ms, save_versioned_with, unix_time_ms_now, virtual_file_name,
    KeyValueStore, FILESYSTEM_KEY,
};

use crate::{
    error::FsError,
    names::{disambiguate, validate_name, COPY_INFIX, RESTORE_INFIX},
    node::{FileNode, FolderNode, FsNode, TrashInfo},
};

/// Schema version of the persisted tree payload.
pub const FILESYSTEM_SCHEMA_VERSION: u32 = 1;
/// Absolute path of the recycle bin folder.
pub const RECYCLE_BIN_PATH: &str = "/RecycleBin";
const RECYCLE_BIN_NAME: &str = "RecycleBin";
const ROOT_NAME: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Pending clipboard operation.
pub enum ClipboardOp {
    /// Paste inserts a copy and keeps the clipboard for repeated pastes.
    Copy,
    /// Paste moves the item and clears the clipboard.
    Cut {
        /// Path the item was cut from.
        source_path: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Single-slot clipboard holding a snapshot of the copied or cut node.
pub struct Clipboard {
    pub op: ClipboardOp,
    pub item: FsNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A search match and the path of the folder that contains it.
pub struct SearchHit<'a> {
    pub node: &'a FsNode,
    pub parent_path: &'a str,
}

/// Builds the tree created on first boot.
pub fn default_tree(now: u64) -> FsNode {
    let mut root = FolderNode::new(ROOT_NAME, "/", now);
    root.path = "/".to_string();

    for name in ["Desktop", "Pictures", "Music", "Videos", "Downloads"] {
        root.insert(FsNode::Folder(FolderNode::new(name, "/", now)));
    }

    let mut documents = FolderNode::new("Documents", "/", now);
    documents.insert(FsNode::File(FileNode::new(
        "Sample.txt",
        "This is a sample text file.",
        "/Documents",
        now,
    )));
    root.insert(FsNode::Folder(documents));

    root.insert(FsNode::Folder(recycle_bin_folder(now)));
    FsNode::Folder(root)
}

fn recycle_bin_folder(now: u64) -> FolderNode {
    let mut bin = FolderNode::new(RECYCLE_BIN_NAME, "/", now);
    bin.hidden = true;
    bin
}

fn is_protected(path: &str) -> bool {
    path == "/" || path == RECYCLE_BIN_PATH
}

/// Hierarchical in-memory file system mirrored to a [`KeyValueStore`].
pub struct VirtualFileSystem {
    root: FsNode,
    clipboard: Option<Clipboard>,
    current_path: String,
    store: Rc<dyn KeyValueStore>,
}

impl std::fmt::Debug for VirtualFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualFileSystem")
            .field("root", &self.root)
            .field("clipboard", &self.clipboard)
            .field("current_path", &self.current_path)
            .finish_non_exhaustive()
    }
}

impl VirtualFileSystem {
    /// Loads the persisted tree from `store`, falling back to [`default_tree`].
    ///
    /// A missing, unreadable, or unsupported stored tree is replaced by the default tree, which is
    /// written back immediately.
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let loaded = match load_versioned_with::<_, FsNode, _>(
            &*store,
            FILESYSTEM_KEY,
            FILESYSTEM_SCHEMA_VERSION,
            |version, _| {
                warn!("discarding file system tree with unsupported schema version {version}");
                Ok(None)
            },
        ) {
            Ok(Some(root @ FsNode::Folder(_))) => Some(root),
            Ok(Some(FsNode::File(_))) => {
                warn!("stored file system root is not a folder; resetting to defaults");
                None
            }
            Ok(None) => None,
            Err(err) => {
                warn!("stored file system tree is unreadable; resetting to defaults: {err}");
                None
            }
        };

        let needs_write = loaded.is_none();
        let mut fs = Self {
            root: loaded.unwrap_or_else(|| default_tree(next_monotonic_timestamp_ms())),
            clipboard: None,
            current_path: "/".to_string(),
            store,
        };
        let repaired = fs.ensure_recycle_bin();
        if needs_write || repaired {
            fs.persist();
        }
        fs
    }

    /// Returns the tree root.
    pub fn root(&self) -> &FsNode {
        &self.root
    }

    /// Returns the current clipboard contents, if any.
    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    /// Folder an explorer view is currently showing.
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Switches the current folder.
    ///
    /// # Errors
    ///
    /// Fails when `path` does not resolve to a folder.
    pub fn navigate_to(&mut self, path: &str) -> Result<(), FsError> {
        let path = normalize_virtual_path(path);
        self.folder(&path)?;
        self.current_path = path;
        Ok(())
    }

    /// Returns the current folder node, or `None` when it has since been removed.
    pub fn current_folder(&self) -> Option<&FsNode> {
        self.get_item(&self.current_path)
    }

    pub fn get_item(&self, path: &str) -> Option<&FsNode> {
        let path = normalize_virtual_path(path);
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(&self.root, |node, segment| {
                node.as_folder()?.children.get(segment)
            })
    }

    pub fn exists(&self, path: &str) -> bool {
        self.get_item(path).is_some()
    }

    /// Returns the visible direct children of a folder; empty for files and missing paths.
    pub fn get_contents(&self, path: &str) -> Vec<&FsNode> {
        self.get_item(path)
            .and_then(FsNode::as_folder)
            .map(|folder| {
                folder
                    .children
                    .values()
                    .filter(|child| !child.is_hidden())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the file's content, or `None` for folders and missing paths.
    pub fn read_file(&self, path: &str) -> Option<&str> {
        self.get_item(path)
            .and_then(FsNode::as_file)
            .map(|file| file.content.as_str())
    }

    /// Creates an empty folder named `name` under `parent_path`.
    ///
    /// # Errors
    ///
    /// Fails on an invalid name, a missing or non-folder parent, a parent inside the recycle bin,
    /// or a sibling collision.
    pub fn create_folder(&mut self, name: &str, parent_path: &str) -> Result<(), FsError> {
        let now = next_monotonic_timestamp_ms();
        let parent_path = normalize_virtual_path(parent_path);
        let node = FsNode::Folder(FolderNode::new(name, &parent_path, now));
        self.insert_new(name, &parent_path, node)
    }

    /// Creates a file named `name` with `content` under `parent_path`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::create_folder`].
    pub fn create_file(
        &mut self,
        name: &str,
        content: &str,
        parent_path: &str,
    ) -> Result<(), FsError> {
        let now = next_monotonic_timestamp_ms();
        let parent_path = normalize_virtual_path(parent_path);
        let node = FsNode::File(FileNode::new(name, content, &parent_path, now));
        self.insert_new(name, &parent_path, node)
    }

    fn insert_new(&mut self, name: &str, parent_path: &str, node: FsNode) -> Result<(), FsError> {
        validate_name(name)?;
        if is_same_or_descendant(parent_path, RECYCLE_BIN_PATH) {
            return Err(FsError::ProtectedPath(parent_path.to_string()));
        }
        let parent = self.folder_mut(parent_path)?;
        if parent.has_child(name) {
            return Err(FsError::NameTaken {
                parent: parent_path.to_string(),
                name: name.to_string(),
            });
        }
        parent.insert(node);
        self.persist();
        Ok(())
    }

    /// Renames the node at `path`, cascading the new path to every descendant.
    ///
    /// Returns the node's new path.
    ///
    /// # Errors
    ///
    /// Fails for the root and the recycle bin, invalid names, missing nodes, and sibling
    /// collisions (including renaming to the current name).
    pub fn rename(&mut self, path: &str, new_name: &str) -> Result<String, FsError> {
        let path = normalize_virtual_path(path);
        if is_protected(&path) {
            return Err(FsError::ProtectedPath(path));
        }
        validate_name(new_name)?;

        let now = unix_time_ms_now();
        let parent_path = parent_virtual_path(&path);
        let old_name = virtual_file_name(&path);
        let parent = self.folder_mut(&parent_path)?;
        if !parent.has_child(old_name) {
            return Err(FsError::NotFound(path.clone()));
        }
        if parent.has_child(new_name) {
            return Err(FsError::NameTaken {
                parent: parent_path,
                name: new_name.to_string(),
            });
        }

        let Some(mut node) = parent.children.remove(old_name) else {
            return Err(FsError::NotFound(path.clone()));
        };
        node.place(new_name, &parent_path);
        node.touch(now);
        let new_path = node.path().to_string();
        parent.insert(node);
        self.persist();
        Ok(new_path)
    }

    /// Replaces a file's content.
    ///
    /// # Errors
    ///
    /// Fails when `path` is missing or is a folder.
    pub fn write_file(&mut self, path: &str, content: &str) -> Result<(), FsError> {
        let path = normalize_virtual_path(path);
        let now = unix_time_ms_now();
        let node = self
            .node_mut(&path)
            .ok_or_else(|| FsError::NotFound(path.clone()))?;
        let file = node
            .as_file_mut()
            .ok_or_else(|| FsError::NotAFile(path.clone()))?;
        file.set_content(content, now);
        self.persist();
        Ok(())
    }

    /// Soft-deletes `path` into the recycle bin and returns the entry's recycle bin path.
    ///
    /// Colliding entries are renamed with a `_N` suffix.
    ///
    /// # Errors
    ///
    /// Fails for the root and the recycle bin, items already in the bin, and missing nodes.
    pub fn delete(&mut self, path: &str) -> Result<String, FsError> {
        let path = normalize_virtual_path(path);
        if is_protected(&path) {
            return Err(FsError::ProtectedPath(path));
        }
        if is_same_or_descendant(&path, RECYCLE_BIN_PATH) {
            return Err(FsError::AlreadyInRecycleBin(path));
        }
        if !self.exists(&path) {
            return Err(FsError::NotFound(path));
        }
        self.folder(RECYCLE_BIN_PATH)?;

        let now = unix_time_ms_now();
        let parent_path = parent_virtual_path(&path);
        let Some(mut node) = self
            .folder_mut(&parent_path)?
            .children
            .remove(virtual_file_name(&path))
        else {
            return Err(FsError::NotFound(path));
        };
        node.set_trash(Some(TrashInfo {
            original_path: path.clone(),
            deleted_date: now,
        }));

        let bin = self.folder_mut(RECYCLE_BIN_PATH)?;
        let entry_name = disambiguate(node.name(), COPY_INFIX, |candidate| {
            bin.has_child(candidate)
        });
        node.place(&entry_name, RECYCLE_BIN_PATH);
        let entry_path = node.path().to_string();
        bin.insert(node);
        self.persist();
        Ok(entry_path)
    }

    /// Moves a recycle bin entry back to its original folder and returns the restored path.
    ///
    /// When the original name is taken the entry is restored as `stem_restored_N.ext`.
    ///
    /// # Errors
    ///
    /// Fails when `recycle_bin_path` is not a direct bin entry with restore metadata, or when the
    /// original parent folder no longer exists.
    pub fn restore(&mut self, recycle_bin_path: &str) -> Result<String, FsError> {
        let path = normalize_virtual_path(recycle_bin_path);
        if path == RECYCLE_BIN_PATH || parent_virtual_path(&path) != RECYCLE_BIN_PATH {
            return Err(FsError::NotInRecycleBin(path));
        }
        let trash = self
            .get_item(&path)
            .ok_or_else(|| FsError::NotFound(path.clone()))?
            .trash()
            .cloned()
            .ok_or_else(|| FsError::NotInRecycleBin(path.clone()))?;

        let original_parent = parent_virtual_path(&trash.original_path);
        let original_name = virtual_file_name(&trash.original_path).to_string();
        let restored_name = match self.get_item(&original_parent).and_then(FsNode::as_folder) {
            Some(parent) if !is_same_or_descendant(&original_parent, RECYCLE_BIN_PATH) => {
                disambiguate(&original_name, RESTORE_INFIX, |candidate| {
                    parent.has_child(candidate)
                })
            }
            _ => return Err(FsError::MissingOriginalParent(original_parent)),
        };

        let Some(mut node) = self
            .folder_mut(RECYCLE_BIN_PATH)?
            .children
            .remove(virtual_file_name(&path))
        else {
            return Err(FsError::NotFound(path));
        };
        node.set_trash(None);
        node.place(&restored_name, &original_parent);
        let restored_path = node.path().to_string();
        self.folder_mut(&original_parent)?.insert(node);
        self.persist();
        Ok(restored_path)
    }

    /// Erases a recycle bin entry for good.
    ///
    /// # Errors
    ///
    /// Fails when `recycle_bin_path` is not a direct child of the recycle bin.
    pub fn permanent_delete(&mut self, recycle_bin_path: &str) -> Result<(), FsError> {
        let path = normalize_virtual_path(recycle_bin_path);
        if path == RECYCLE_BIN_PATH || parent_virtual_path(&path) != RECYCLE_BIN_PATH {
            return Err(FsError::NotInRecycleBin(path));
        }
        if self
            .folder_mut(RECYCLE_BIN_PATH)?
            .children
            .remove(virtual_file_name(&path))
            .is_none()
        {
            return Err(FsError::NotFound(path));
        }
        self.persist();
        Ok(())
    }

    /// Erases every recycle bin entry.
    ///
    /// # Errors
    ///
    /// Fails only when the recycle bin folder is missing.
    pub fn empty_recycle_bin(&mut self) -> Result<(), FsError> {
        self.folder_mut(RECYCLE_BIN_PATH)?.children.clear();
        self.persist();
        Ok(())
    }

    pub fn recycle_bin_contents(&self) -> Vec<&FsNode> {
        self.get_item(RECYCLE_BIN_PATH)
            .and_then(FsNode::as_folder)
            .map(|bin| bin.children.values().collect())
            .unwrap_or_default()
    }

    /// Puts a snapshot of `path` on the clipboard for repeated pastes.
    ///
    /// # Errors
    ///
    /// Fails when `path` is missing.
    pub fn copy(&mut self, path: &str) -> Result<(), FsError> {
        let path = normalize_virtual_path(path);
        let item = self
            .get_item(&path)
            .cloned()
            .ok_or(FsError::NotFound(path))?;
        self.clipboard = Some(Clipboard {
            op: ClipboardOp::Copy,
            item,
        });
        Ok(())
    }

    /// Puts a snapshot of `path` on the clipboard; the next paste moves it.
    ///
    /// # Errors
    ///
    /// Fails for the root and the recycle bin, and when `path` is missing.
    pub fn cut(&mut self, path: &str) -> Result<(), FsError> {
        let path = normalize_virtual_path(path);
        if is_protected(&path) {
            return Err(FsError::ProtectedPath(path));
        }
        let item = self
            .get_item(&path)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.clone()))?;
        self.clipboard = Some(Clipboard {
            op: ClipboardOp::Cut { source_path: path },
            item,
        });
        Ok(())
    }

    /// Inserts the clipboard item into `target_path` and returns its new path.
    ///
    /// Collisions get a `_N` suffix. A cut is completed by removing the source, if the node at the
    /// source path is still the one that was cut, and clearing the clipboard.
    ///
    /// # Errors
    ///
    /// Fails on an empty clipboard, a target that is not a folder or lies in the recycle bin, and
    /// a cut folder pasted into itself or a descendant.
    pub fn paste(&mut self, target_path: &str) -> Result<String, FsError> {
        let target = normalize_virtual_path(target_path);
        let Some(clipboard) = self.clipboard.clone() else {
            return Err(FsError::ClipboardEmpty);
        };
        if is_same_or_descendant(&target, RECYCLE_BIN_PATH) {
            return Err(FsError::ProtectedPath(target));
        }
        if let ClipboardOp::Cut { source_path } = &clipboard.op {
            if clipboard.item.is_folder() && is_same_or_descendant(&target, source_path) {
                return Err(FsError::PasteIntoSelf {
                    cut_path: source_path.clone(),
                    target,
                });
            }
        }

        let now = next_monotonic_timestamp_ms();
        let cut_identity = (clipboard.item.is_folder(), clipboard.item.created());
        let folder = self.folder_mut(&target)?;
        let name = disambiguate(clipboard.item.name(), COPY_INFIX, |candidate| {
            folder.has_child(candidate)
        });
        let mut node = clipboard.item;
        node.set_trash(None);
        node.set_created(now);
        node.place(&name, &target);
        let new_path = node.path().to_string();
        folder.insert(node);

        if let ClipboardOp::Cut { source_path } = clipboard.op {
            let still_cut_node = self
                .get_item(&source_path)
                .is_some_and(|node| (node.is_folder(), node.created()) == cut_identity);
            if still_cut_node {
                let source_parent = parent_virtual_path(&source_path);
                if let Ok(parent) = self.folder_mut(&source_parent) {
                    parent.children.remove(virtual_file_name(&source_path));
                }
            }
            self.clipboard = None;
        }

        self.persist();
        Ok(new_path)
    }

    /// Finds every visible node below `path` whose name contains `query`, ignoring case.
    pub fn search(&self, query: &str, path: &str) -> Vec<SearchHit<'_>> {
        let Some(start) = self.get_item(path).filter(|node| node.is_folder()) else {
            return Vec::new();
        };
        let needle = query.to_lowercase();
        let mut hits = Vec::new();
        start.walk_visible(&mut |node| {
            if node.name().to_lowercase().contains(&needle) {
                hits.push(SearchHit {
                    node,
                    parent_path: parent_path_of(node.path()),
                });
            }
        });
        hits
    }

    fn folder(&self, path: &str) -> Result<&FolderNode, FsError> {
        self.get_item(path)
            .ok_or_else(|| FsError::NotFound(path.to_string()))?
            .as_folder()
            .ok_or_else(|| FsError::NotAFolder(path.to_string()))
    }

    fn node_mut(&mut self, path: &str) -> Option<&mut FsNode> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(&mut self.root, |node, segment| {
                node.as_folder_mut()?.children.get_mut(segment)
            })
    }

    fn folder_mut(&mut self, path: &str) -> Result<&mut FolderNode, FsError> {
        self.node_mut(path)
            .ok_or_else(|| FsError::NotFound(path.to_string()))?
            .as_folder_mut()
            .ok_or_else(|| FsError::NotAFolder(path.to_string()))
    }

    fn ensure_recycle_bin(&mut self) -> bool {
        let Some(root) = self.root.as_folder_mut() else {
            return false;
        };
        if root.children.get(RECYCLE_BIN_NAME).is_some_and(FsNode::is_folder) {
            return false;
        }
        warn!("file system tree has no recycle bin; recreating it");
        root.insert(FsNode::Folder(recycle_bin_folder(unix_time_ms_now())));
        true
    }

    fn persist(&self) {
        if let Err(err) = save_versioned_with(
            &*self.store,
            FILESYSTEM_KEY,
            FILESYSTEM_SCHEMA_VERSION,
            &self.root,
        ) {
            warn!("file system persist failed: {err}");
        }
    }
}

/// Parent folder path of a node path, borrowed from the node's own path string.
fn parent_path_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}
