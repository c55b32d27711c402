//! Typed failures for virtual file system operations.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reason a virtual file system operation was rejected.
///
/// None of these leave the tree partially mutated: a failed call is a no-op.
pub enum FsError {
    /// No node exists at the path.
    #[error("no such file or folder: {0}")]
    NotFound(String),
    /// The path resolves to a file where a folder was required.
    #[error("not a folder: {0}")]
    NotAFolder(String),
    /// The path resolves to a folder where a file was required.
    #[error("not a file: {0}")]
    NotAFile(String),
    /// A sibling with the requested name already exists.
    #[error("`{name}` already exists in {parent}")]
    NameTaken {
        /// Folder that already holds the name.
        parent: String,
        /// Requested name.
        name: String,
    },
    /// The name is empty, a dot segment, or contains a path separator.
    #[error("invalid name: {0:?}")]
    InvalidName(String),
    /// The root and the recycle bin folder cannot be renamed, deleted, cut, or written into.
    #[error("{0} is protected")]
    ProtectedPath(String),
    /// The path is not a direct recycle bin entry carrying restore metadata.
    #[error("{0} is not a recycle bin entry")]
    NotInRecycleBin(String),
    /// The node already lives in the recycle bin.
    #[error("{0} is already in the recycle bin")]
    AlreadyInRecycleBin(String),
    /// The folder an entry was deleted from no longer exists.
    #[error("original location {0} no longer exists")]
    MissingOriginalParent(String),
    /// Paste was requested with nothing on the clipboard.
    #[error("clipboard is empty")]
    ClipboardEmpty,
    /// A cut folder was pasted into itself or one of its descendants.
    #[error("cannot move {cut_path} into {target}")]
    PasteIntoSelf {
        /// Path of the cut folder.
        cut_path: String,
        /// Requested paste target.
        target: String,
    },
}
