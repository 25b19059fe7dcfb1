//! The hand-off itself: turning a parsed command line into a [`LaunchPlan`]
//! and replacing this process with it.
//!
//! Nothing here touches the launcher's own environment or working directory.
//! Both are configured on the [`Command`] that replaces this process, so a plan
//! can be built and inspected without side effects.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

// non-std crates
use serde::{Serialize, Serializer};

// project specific modules/crates
use crate::cli::Positionals;
use crate::common_fs::{absolute_path, resolve_workdir};
use crate::error::LaunchError;

/// The variable that stops Python from loading packages from the user's site directory.
pub const ISOLATION_VAR: &str = "PYTHONNOUSERSITE";

/// The value given to [`ISOLATION_VAR`].
pub const ISOLATION_VALUE: &str = "True";

/// Render an OS string for display only; undecodable bytes become U+FFFD.
fn serialize_lossy<S: Serializer>(value: impl AsRef<OsStr>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&value.as_ref().to_string_lossy())
}

fn serialize_lossy_list<S: Serializer>(values: &[OsString], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(values.iter().map(|v| v.to_string_lossy()))
}

/// A fully resolved launch, ready to be executed.
///
/// The JSON form is only a report (for `--dry-run`). Arguments that are not valid
/// UTF-8 are shown lossily there but are passed to the interpreter byte for byte.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LaunchPlan {
    /// The absolute path of the interpreter that replaces this process.
    #[serde(serialize_with = "serialize_lossy")]
    pub program: PathBuf,

    /// The arguments given to `program` (excluding `program` itself).
    #[serde(serialize_with = "serialize_lossy_list")]
    pub args: Vec<OsString>,

    /// The absolute directory `program` starts in.
    #[serde(serialize_with = "serialize_lossy")]
    pub workdir: PathBuf,

    /// Variables added to the inherited environment.
    pub env: Vec<(String, String)>,
}

impl LaunchPlan {
    /// Resolve `positionals` as if invoked from `cwd`.
    ///
    /// The three path arguments are made absolute first, then the working directory
    /// is checked. No process is started here.
    pub fn new(
        positionals: Positionals,
        program: PathBuf,
        cwd: &Path,
    ) -> Result<Self, LaunchError> {
        let Positionals {
            workdir,
            paths,
            extra,
        } = positionals;
        let mut args = Vec::with_capacity(paths.len() + extra.len());
        for path in paths {
            let resolved = absolute_path(&path, cwd);
            log::debug!("resolved {} to {}", path.display(), resolved.display());
            args.push(resolved.into_os_string());
        }
        args.extend(extra);

        let workdir = resolve_workdir(&workdir, cwd)?;
        Ok(LaunchPlan {
            program,
            args,
            workdir,
            env: vec![(ISOLATION_VAR.to_string(), ISOLATION_VALUE.to_string())],
        })
    }

    /// Build the [`Command`] that carries out this plan.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(&self.workdir)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        cmd
    }

    /// Replace the current process with this plan.
    ///
    /// This only returns if the interpreter could not be executed.
    #[cfg(unix)]
    pub fn exec(self) -> LaunchError {
        use std::os::unix::process::CommandExt;

        log::debug!("exec {} {:?} in {}", self.program.display(), self.args, self.workdir.display());
        let source = self.command().exec();
        LaunchError::Exec {
            program: self.program,
            source,
        }
    }

    /// Run this plan to completion and exit with its status.
    ///
    /// Without process replacement the launcher waits for the child and propagates
    /// its exit code. This only returns if the interpreter could not be started.
    #[cfg(not(unix))]
    pub fn exec(self) -> LaunchError {
        log::debug!("spawn {} {:?} in {}", self.program.display(), self.args, self.workdir.display());
        match self.command().status() {
            Ok(status) => std::process::exit(status.code().unwrap_or(1)),
            Err(source) => LaunchError::Exec {
                program: self.program,
                source,
            },
        }
    }
}
