use std::path::{Component, Path};

use crate::core::{IndexError, Result};

pub const ROOT: &str = "/";

pub fn is_root<P: AsRef<Path>>(path: P) -> bool {
    let mut components = path.as_ref().components();
    components.next() == Some(Component::RootDir) && components.next().is_none()
}

/// Checks that `path` is absolute, UTF-8 and free of `.`/`..` components.
/// Canonicalization is left to the caller, so such paths are rejected rather than resolved.
pub fn validate<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let Some(raw) = path.to_str() else {
        return Err(IndexError::invalid_path(path));
    };
    if !raw.starts_with(ROOT) {
        return Err(IndexError::invalid_path(path));
    }
    let mut components = path.components();
    if components.next() != Some(Component::RootDir) {
        return Err(IndexError::invalid_path(path));
    }
    if components.any(|c| !matches!(c, Component::Normal(_))) {
        return Err(IndexError::invalid_path(path));
    }
    Ok(())
}

/// A child name is a single plain path segment.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(ROOT)
}

/// Splits an absolute path into `(parent directory, leaf name)`.
///
/// The root splits into `("/", "")`, so callers recognise it by `parent == path`.
/// Expects a path that already passed [`validate`].
pub fn split_path(path: &Path) -> (&Path, &str) {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => (parent, name.to_str().unwrap_or_default()),
        _ => (path, ""),
    }
}
