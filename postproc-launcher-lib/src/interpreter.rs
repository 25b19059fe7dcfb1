//! This module finds the Python interpreter that the post-processing script is
//! handed off to.

use std::path::{Path, PathBuf};

// non-std crates
use lenient_semver;
use semver::Version;
use which::{which, which_in};

// project-specific modules/crates
use crate::common_fs::absolute_path;
use crate::error::LaunchError;

/// The executable names tried, in order, when no specific version is requested.
pub const DEFAULT_NAMES: [&str; 2] = ["python3", "python"];

/// Search `$PATH` for the first of `names` that exists.
fn which_first<I: IntoIterator<Item = String>>(names: I) -> Option<PathBuf> {
    for name in names {
        if let Ok(cmd) = which(&name) {
            log::debug!("found interpreter {} as {}", name, cmd.display());
            return Some(cmd);
        }
        log::debug!("{} is not in $PATH", name);
    }
    None
}

/// Fetch the path to the interpreter requested by `version`.
///
/// The specified `version` can be either
///
/// - a blank string, meaning whatever [`DEFAULT_NAMES`] finds first in `$PATH`
/// - a full or partial version specification (ie `3` or `3.11`)
/// - a path to a directory containing the interpreter
/// - a path to the interpreter itself
///
/// Relative paths are taken from `cwd`. If a versioned executable is not found,
/// the interpreter is sought only by its default names.
///
/// The returned path is always absolute.
pub fn find_interpreter(version: &str, cwd: &Path) -> Result<PathBuf, LaunchError> {
    let not_found = |source| LaunchError::InterpreterNotFound {
        name: if version.is_empty() {
            DEFAULT_NAMES[0].to_string()
        } else {
            version.to_string()
        },
        source,
    };

    let found = if version.is_empty() {
        which_first(DEFAULT_NAMES.map(String::from))
            .ok_or_else(|| not_found(which::Error::CannotFindBinaryPath))?
    } else if let Ok(semver) = lenient_semver::parse_into::<Version>(version) {
        // `version` specified has at least a major version number
        let mut names = Vec::with_capacity(4);
        if version.contains('.') {
            names.push(format!("python{}.{}", semver.major, semver.minor));
        }
        names.push(format!("python{}", semver.major));
        names.extend(DEFAULT_NAMES.map(String::from));
        // On Windows the version is typically not part of the executable's name,
        // so falling back to the default names is how a versioned request succeeds there.
        which_first(names).ok_or_else(|| not_found(which::Error::CannotFindBinaryPath))?
    } else {
        // `version` specified is not a version; treat as path/to/bin or path/to/python
        let location = absolute_path(Path::new(version), cwd);
        if location.is_dir() {
            DEFAULT_NAMES
                .iter()
                .find_map(|name| which_in(name, Some(&location), cwd).ok())
                .ok_or_else(|| not_found(which::Error::CannotFindBinaryPath))?
        } else {
            which_in(&location, None::<&str>, cwd).map_err(not_found)?
        }
    };
    Ok(absolute_path(&found, cwd))
}
