//! A module to hold all common file system functionality.

use std::fs;
use std::path::{Component, Path, PathBuf};

// project specific modules/crates
use crate::error::LaunchError;

/// This was copied from [cargo source code](https://github.com/rust-lang/cargo/blob/fede83ccf973457de319ba6fa0e36ead454d2e20/src/cargo/util/paths.rs#L61).
///
/// NOTE: Rust [std::path] crate has no native functionality equivalent to this.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = path.components().peekable();
    let mut ret = if let Some(c @ Component::Prefix(..)) = components.peek().cloned() {
        components.next();
        PathBuf::from(c.as_os_str())
    } else {
        PathBuf::new()
    };

    for component in components {
        match component {
            Component::Prefix(..) => unreachable!(),
            Component::RootDir => {
                ret.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                ret.pop();
            }
            Component::Normal(c) => {
                ret.push(c);
            }
        }
    }
    ret
}

/// Make `path` absolute by joining it onto `base` (if needed) and collapsing any
/// `.` or `..` components.
///
/// This is purely lexical: symlinks are not followed and `path` need not exist.
/// `base` is expected to be absolute already (ie [`std::env::current_dir`]).
pub fn absolute_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Resolve `workdir` against `base` and make sure it names an existing directory.
pub fn resolve_workdir(workdir: &Path, base: &Path) -> Result<PathBuf, LaunchError> {
    let resolved = absolute_path(workdir, base);
    let meta = fs::metadata(&resolved).map_err(|source| LaunchError::InvalidWorkdir {
        path: resolved.clone(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(LaunchError::NotADirectory(resolved));
    }
    Ok(resolved)
}
