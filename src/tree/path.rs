//! Path resolution for tree roots and leaf names

use crate::error::ApiError;
use std::path::{Component, Path, PathBuf};

/// Resolve a source directory to the absolute path stored in the tree file
pub fn absolute_root(path: &Path) -> Result<PathBuf, ApiError> {
    // dunce avoids UNC prefixes on Windows
    dunce::canonicalize(path).map_err(|_| ApiError::InvalidPath(path.to_path_buf()))
}

/// Leaf name for a file below `root`: its relative path joined with `/`
///
/// Names must be valid UTF-8 so that distinct files keep distinct names.
pub fn relative_name(root: &Path, file: &Path) -> Result<String, ApiError> {
    let relative = file
        .strip_prefix(root)
        .map_err(|_| ApiError::InvalidPath(file.to_path_buf()))?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(part) => parts.push(part.to_string()),
                None => return Err(ApiError::InvalidPath(file.to_path_buf())),
            },
            _ => return Err(ApiError::InvalidPath(file.to_path_buf())),
        }
    }
    if parts.is_empty() {
        return Err(ApiError::InvalidPath(file.to_path_buf()));
    }
    Ok(parts.join("/"))
}

/// Location on disk of a leaf name under `root`
///
/// Names come from tree files, which may be forged, so any part that is not a
/// plain file name (`.`, `..`, a root or drive prefix) is rejected.
pub fn resolve_name(root: &Path, name: &str) -> Result<PathBuf, ApiError> {
    let mut resolved = root.to_path_buf();
    for part in name.split('/').filter(|part| !part.is_empty()) {
        let mut components = Path::new(part).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(normal)), None) => resolved.push(normal),
            _ => return Err(ApiError::InvalidPath(PathBuf::from(name))),
        }
    }
    if resolved == root {
        return Err(ApiError::InvalidPath(PathBuf::from(name)));
    }
    Ok(resolved)
}
