//! The error type shared by every stage of a launch.
//!
//! None of these are recoverable. [`crate::run::run_main`] logs the message and
//! turns the error into a process exit code via [`LaunchError::exit_code`].

use std::io;
use std::path::PathBuf;

// non-std crates
use thiserror::Error;

/// Everything that can stop a launch before (or instead of) the hand-off.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The command line did not satisfy the positional contract.
    #[error("{0}")]
    Usage(#[from] clap::Error),

    /// The requested working directory could not be inspected.
    #[error("cannot use working directory {}: {source}", .path.display())]
    InvalidWorkdir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The requested working directory exists but is something else.
    #[error("working directory {} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The directory this process was started from is unavailable.
    #[error("could not determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),

    /// No interpreter matched the requested name, version or location.
    #[error("could not find interpreter {name}: {source}")]
    InterpreterNotFound {
        name: String,
        #[source]
        source: which::Error,
    },

    /// The plan could not be rendered for `--dry-run`.
    #[error("could not serialize launch plan: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The operating system refused to run the interpreter.
    #[error("failed to execute {}: {source}", .program.display())]
    Exec {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    /// The status this process should exit with when it fails with `self`.
    ///
    /// Usage errors keep clap's own code (2 for a bad command line, 0 for
    /// `--help`). Everything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::Usage(err) => err.exit_code(),
            _ => 1,
        }
    }
}
