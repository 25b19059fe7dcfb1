//! The root module for the postproc_launcher_lib package.
//! This module mainly holds the declarations of this package's other modules.
//!
//! The `postproc-launcher` binary in the sibling `postproc-launcher-cli` package is
//! a thin driver around [`run::run_main`].

// project specific modules/crates
pub mod cli;
pub mod common_fs;
pub mod error;
pub mod interpreter;
pub mod launch;
pub mod logger;
pub mod run;
