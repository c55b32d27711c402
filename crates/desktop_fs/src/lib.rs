//! Virtual file system for the desktop shell.
//!
//! A single hierarchical tree of folders and text files with path-addressed CRUD, a two-phase
//! delete through a hidden recycle bin, a single-slot copy/cut clipboard, and case-insensitive
//! search. The whole tree is mirrored to a [`platform_host::KeyValueStore`] after every mutation.

pub mod display;
pub mod error;
pub mod names;
pub mod node;
pub mod service;

pub use display::{format_size, FileKind};
pub use error::FsError;
pub use names::{disambiguate, split_extension, validate_name, COPY_INFIX, RESTORE_INFIX};
pub use node::{FileNode, FolderNode, FsNode, TrashInfo};
pub use service::{
    default_tree, Clipboard, ClipboardOp, SearchHit, VirtualFileSystem,
    FILESYSTEM_SCHEMA_VERSION, RECYCLE_BIN_PATH,
};
