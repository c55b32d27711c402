//! Virtual-path helpers shared across host abstractions.

/// Normalizes a virtual filesystem path using Explorer UI semantics.
///
/// This helper trims whitespace, converts backslashes to `/`, resolves `.`/`..`, ensures a
/// leading slash, and returns `/` for empty or fully-collapsed paths.
pub fn normalize_virtual_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "/".to_string();
    }

    let mut out = String::new();
    for segment in trimmed.replace('\\', "/").split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if segment == ".." {
            if let Some(idx) = out.rfind('/') {
                out.truncate(idx);
            }
            continue;
        }
        out.push('/');
        out.push_str(segment);
    }

    if out.is_empty() {
        "/".to_string()
    } else {
        out
    }
}

/// Joins a child name onto a normalized parent path without doubling the root slash.
pub fn join_virtual_path(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Returns the parent of a normalized path. The parent of `/` is `/`.
pub fn parent_virtual_path(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

/// Returns the last segment of a normalized path, or `""` for the root.
pub fn virtual_file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Returns `true` when `path` equals `base` or lies somewhere below it.
pub fn is_same_or_descendant(path: &str, base: &str) -> bool {
    if base == "/" {
        return true;
    }
    path.starts_with(base) && (path.len() == base.len() || path.as_bytes()[base.len()] == b'/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_virtual_path_matches_expected_cases() {
        let cases = [
            ("", "/"),
            ("   ", "/"),
            ("foo/bar", "/foo/bar"),
            ("/foo//bar/", "/foo/bar"),
            ("./foo/../bar", "/bar"),
            ("\\\\foo\\\\bar", "/foo/bar"),
            ("/../../", "/"),
        ];

        for (input, expected) in cases {
            assert_eq!(normalize_virtual_path(input), expected, "input={input:?}");
        }
    }

    #[test]
    fn join_special_cases_root() {
        assert_eq!(join_virtual_path("/", "Documents"), "/Documents");
        assert_eq!(join_virtual_path("/Documents", "a.txt"), "/Documents/a.txt");
    }

    #[test]
    fn parent_and_file_name_split_paths() {
        assert_eq!(parent_virtual_path("/Documents/a.txt"), "/Documents");
        assert_eq!(parent_virtual_path("/Documents"), "/");
        assert_eq!(parent_virtual_path("/"), "/");
        assert_eq!(virtual_file_name("/Documents/a.txt"), "a.txt");
        assert_eq!(virtual_file_name("/"), "");
    }

    #[test]
    fn descendant_check_respects_segment_boundaries() {
        assert!(is_same_or_descendant("/Docs", "/Docs"));
        assert!(is_same_or_descendant("/Docs/a/b", "/Docs"));
        assert!(!is_same_or_descendant("/Docs2", "/Docs"));
        assert!(is_same_or_descendant("/anything", "/"));
    }
}
