//! This module is the entry point shared by the `postproc-launcher` binary and tests.
//!
//! It exposes 1 function: [`run_main()`].

use std::env;
use std::ffi::OsString;

// non-std crates
use clap::ArgMatches;
use log::{set_max_level, LevelFilter};

// project specific modules/crates
use crate::cli::{get_positionals, parse_args};
use crate::error::LaunchError;
use crate::interpreter::find_interpreter;
use crate::launch::LaunchPlan;
use crate::logger;

/// Parse `args`, resolve the launch and hand off to it.
///
/// `args` includes the program name as its first item, as [`std::env::args_os`] does.
///
/// Only returns (with the exit code to use) when `--dry-run` was given or the launch
/// failed. Otherwise this process has been replaced by the interpreter.
pub fn run_main(args: Vec<OsString>) -> i32 {
    let _ = logger::init();

    match launch(args) {
        Ok(()) => 0,
        Err(LaunchError::Usage(err)) => {
            // clap formats its own usage/help text
            let code = err.exit_code();
            let _ = err.print();
            code
        }
        Err(err) => {
            log::error!("{}", err);
            err.exit_code()
        }
    }
}

/// The logging level requested by the parsed command line.
fn log_level(args: &ArgMatches) -> LevelFilter {
    args.get_one::<String>("verbosity")
        .map(|verbosity| logger::level_for(verbosity))
        .unwrap_or(LevelFilter::Info)
}

fn launch(args: Vec<OsString>) -> Result<(), LaunchError> {
    let args = parse_args(args)?;
    set_max_level(log_level(&args));

    let positionals = get_positionals(&args).ok_or_else(|| {
        LaunchError::Usage(clap::Error::new(
            clap::error::ErrorKind::MissingRequiredArgument,
        ))
    })?;
    let cwd = env::current_dir().map_err(LaunchError::CurrentDir)?;
    let version = args
        .get_one::<String>("interpreter-version")
        .map(String::as_str)
        .unwrap_or_default();
    let interpreter = find_interpreter(version, &cwd)?;
    let plan = LaunchPlan::new(positionals, interpreter, &cwd)?;

    if args.get_flag("dry-run") {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }
    Err(plan.exec())
}
