//! PathGuard - sandbox containment checks
//!
//! Both the sandbox root and the target are resolved to absolute form and
//! compared component by component. A sibling that merely shares a string
//! prefix with the root (`/tmp/root2` vs `/tmp/root`) is never contained.

use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Matches the kernel's limit on chained symlinks
const MAX_SYMLINK_DEPTH: usize = 40;

/// Decide whether `target` lies inside `root`, resolving relative paths
/// against the process working directory. An empty root permits everything.
pub fn permitted(root: &Path, target: &Path) -> bool {
    let base = std::env::current_dir().unwrap_or_default();
    permitted_from(&base, root, target)
}

/// Same as [`permitted`], resolving relative paths against `base`
pub fn permitted_from(base: &Path, root: &Path, target: &Path) -> bool {
    if root.as_os_str().is_empty() {
        debug!(?target, "permitted_from: no sandbox root, permitting");
        return true;
    }

    let root = resolve(base, root);
    let target = resolve(base, target);
    let result = target.starts_with(&root);
    debug!(?root, ?target, %result, "permitted_from: checked");
    result
}

/// Resolve `path` against `base` into a normalized absolute path
///
/// `.` and `..` are folded lexically, then the longest existing ancestor is
/// canonicalized so symlinked prefixes compare equal. The non-existent tail
/// is re-appended unchanged, which lets new files be checked before creation.
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    canonicalize_existing(&normalize(&joined))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the filesystem root stays at the root
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn canonicalize_existing(path: &Path) -> PathBuf {
    canonicalize_following(path, 0)
}

/// Canonicalize the longest existing ancestor, following symlinks that
/// `canonicalize` cannot (dangling links resolve to where a write would land)
fn canonicalize_following(path: &Path, depth: usize) -> PathBuf {
    let mut tail: Vec<OsString> = Vec::new();
    let mut current = path;

    loop {
        if let Ok(canonical) = current.canonicalize() {
            let mut out = canonical;
            for name in tail.iter().rev() {
                out.push(name);
            }
            return out;
        }

        if depth < MAX_SYMLINK_DEPTH {
            if let Some(target) = link_target(current) {
                let mut followed = target;
                for name in tail.iter().rev() {
                    followed.push(name);
                }
                debug!(link = ?current, ?followed, "canonicalize_following: following symlink");
                return canonicalize_following(&normalize(&followed), depth + 1);
            }
        }

        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                current = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

/// Where `path` points if it is a symlink; relative targets are taken from the link's directory
fn link_target(path: &Path) -> Option<PathBuf> {
    let metadata = fs::symlink_metadata(path).ok()?;
    if !metadata.file_type().is_symlink() {
        return None;
    }

    let target = fs::read_link(path).ok()?;
    if target.is_absolute() {
        return Some(target);
    }
    Some(path.parent().map_or_else(|| target.clone(), |parent| parent.join(&target)))
}
