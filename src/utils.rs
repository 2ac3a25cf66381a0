use std::path::{Component, Path, PathBuf};

/// Rebuilds `path` from its normal components only.
///
/// Returns `None` when the path could leave the directory it is joined onto
/// (a `..` component, a root or a drive prefix) or when nothing is left.
pub fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut new_path = PathBuf::new();

    for component in path.components() {
        match component {
            // Skip the current-dir marker "."
            Component::CurDir => {}

            Component::Normal(segment) => new_path.push(segment),

            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if new_path.as_os_str().is_empty() {
        None
    } else {
        Some(new_path)
    }
}
