//! This is the postproc-launcher package's primary binary executable's source code.

use std::env;
use std::ffi::OsString;
use std::process::exit;

use postproc_launcher_lib::run::run_main;

/// This takes the CLI arguments and passes them to [`run_main`].
pub fn main() {
    exit(run_main(env::args_os().collect::<Vec<OsString>>()));
}
