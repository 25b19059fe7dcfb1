//! A module to initialize and customize the logger object used in stderr.
//!
//! stdout belongs to the process that replaces the launcher, so nothing is logged there.

// non-std crates
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

struct SimpleLogger;

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// A private constant to manage the application's logger object.
static LOGGER: SimpleLogger = SimpleLogger;

/// A function to initialize the private `LOGGER`.
///
/// The logging level defaults to [`LevelFilter::Info`].
/// Returns a [`SetLoggerError`] if the `LOGGER` is already initialized.
pub fn init() -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Info))
}

/// Map the CLI's `verbosity` value to a [`LevelFilter`].
pub fn level_for(verbosity: &str) -> LevelFilter {
    if verbosity == "debug" {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}
