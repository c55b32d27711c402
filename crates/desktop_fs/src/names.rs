//! Node name validation and collision disambiguation.

use crate::error::FsError;

/// Infix used when paste or recycle-bin insertion collides with an existing sibling.
pub const COPY_INFIX: &str = "_";
/// Infix used when a restored item collides with an item at its original location.
pub const RESTORE_INFIX: &str = "_restored_";

/// Splits `name` into stem and extension at the last dot.
///
/// Dotfiles (`.profile`) and names ending in a dot have no extension.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

/// Returns `name` unchanged when it is free, otherwise the first free `stem{infix}N.ext`
/// counting from 1.
pub fn disambiguate(name: &str, infix: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(name) {
        return name.to_string();
    }

    let (stem, extension) = split_extension(name);
    let mut counter: u32 = 1;
    loop {
        let candidate = match extension {
            Some(ext) => format!("{stem}{infix}{counter}.{ext}"),
            None => format!("{stem}{infix}{counter}"),
        };
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Rejects names that cannot be a single path segment.
///
/// # Errors
///
/// Returns [`FsError::InvalidName`] for empty names, names with leading or trailing whitespace,
/// `.`/`..`, and names containing `/` or `\`.
pub fn validate_name(name: &str) -> Result<(), FsError> {
    let invalid = name.trim().is_empty()
        || name.trim() != name
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        Err(FsError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}
