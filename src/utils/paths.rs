use std::path::{Component, Path, PathBuf};

/// Resolves `.` and `..` components without touching the filesystem.
///
/// A `..` that would climb above the root is dropped.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    log::debug!("'..' above the root of {}", path.display());
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Path of `target` relative to the directory `base`.
///
/// Both paths are normalized first; they are expected to share a root.
pub(crate) fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base = normalize_lexically(base);
    let target = normalize_lexically(target);

    let base_components: Vec<_> = base.components().collect();
    let target_components: Vec<_> = target.components().collect();

    let common = base_components
        .iter()
        .zip(&target_components)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_components.len() {
        relative.push("..");
    }
    for component in &target_components[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

/// `target` relative to `base`, spelled with forward slashes for an `#include`.
pub(crate) fn include_path(base: &Path, target: &Path) -> String {
    relative_path(base, target)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
