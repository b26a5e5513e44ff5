//! Lexical path helpers
//!
//! Resolution never touches the real filesystem to canonicalize paths, so
//! the same rules apply to on-disk trees and in-memory fixtures.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without consulting the filesystem.
///
/// `..` above the start of a relative path is kept; `..` above a root is
/// dropped.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    parts.iter().collect()
}

/// Express `path` relative to the directory `base`.
///
/// Both paths are normalized first. Returns `path` unchanged when no
/// relative form exists (one absolute and one relative, or `base` climbing
/// out through `..`).
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);

    if let Ok(rest) = path.strip_prefix(&base) {
        return rest.to_path_buf();
    }
    if path.is_absolute() != base.is_absolute() {
        return path;
    }

    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let climbs = &base_parts[common..];
    if climbs.iter().any(|c| !matches!(c, Component::Normal(_))) {
        return path;
    }

    let mut relative = PathBuf::new();
    for _ in climbs {
        relative.push("..");
    }
    for component in &path_parts[common..] {
        relative.push(component);
    }
    relative
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("./a/b/../c.js")), PathBuf::from("a/c.js"));
        assert_eq!(normalize(Path::new("a/../../c.js")), PathBuf::from("../c.js"));
        assert_eq!(normalize(Path::new("/a/../../c.js")), PathBuf::from("/c.js"));
        assert_eq!(normalize(Path::new("")), PathBuf::new());
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to(Path::new("app/lib/x.js"), Path::new("app")),
            PathBuf::from("lib/x.js")
        );
        assert_eq!(
            relative_to(Path::new("shared/x.css"), Path::new("app/pages")),
            PathBuf::from("../../shared/x.css")
        );
        assert_eq!(relative_to(Path::new("x.js"), Path::new("")), PathBuf::from("x.js"));
        assert_eq!(
            relative_to(Path::new("x.js"), Path::new("../outside")),
            PathBuf::from("x.js")
        );
    }
}
