//! Logical package paths derived from file locations.

use std::path::{Component, Path};

/// Derives a file's logical package path relative to `root`.
///
/// The root is stripped from the file path, the file name is dropped and the
/// remaining directory components are joined with `/`, whatever the platform
/// separator. Files directly under the root yield the empty string. A file
/// outside `root` keeps its full directory path, minus any root or drive
/// component.
///
/// ```
/// use layer_lint_core::logical_package_path;
/// use std::path::Path;
///
/// let p = logical_package_path(Path::new("/src"), Path::new("/src/domain/user/user.go"));
/// assert_eq!(p, "domain/user");
/// ```
#[must_use]
pub fn logical_package_path(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let dir = relative.parent().unwrap_or_else(|| Path::new(""));
    to_slash(dir)
}

/// Joins the normal components of `path` with `/`.
fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
