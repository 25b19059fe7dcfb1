//! This module holds the Command Line Interface design.
//!
//! Launcher options are only recognized before `WORKDIR`. From the first argument
//! that is not a launcher option onward, everything is positional and the values
//! after `PATH3` reach the script exactly as given (including `--` and anything
//! that looks like one of our own options).

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

// non-std crates
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

/// The positional arguments that are made absolute before the hand-off, in order.
pub const RESOLVED_PATHS: [&str; 3] = ["script", "input", "output"];

/// Builds and returns the Command Line Interface's argument parsing object.
pub fn get_arg_parser() -> Command {
    Command::new("postproc-launcher")
        .about("Run a post-processing script from a given directory with absolute paths.")
        .arg(
            Arg::new("verbosity")
                .long("verbosity")
                .short('v')
                .default_value("info")
                .value_parser(["debug", "info"])
                .long_help(
                    "This controls the launcher's own verbosity on stderr.
Nothing is printed at the ``info`` level when the hand-off succeeds.
",
                ),
        )
        .arg(
            Arg::new("interpreter-version")
                .long("interpreter-version")
                .default_value("")
                .long_help(
                    "The desired version of the Python interpreter to launch.

- Set this option to a blank string (``''``) to use the first
  ``python3`` (or ``python``) found in ``$PATH``.
- A full or partial version (``3``, ``3.11``) looks for
  ``python3.11`` then ``python3`` before falling back to the default.
- This value can also be a path to the interpreter itself or to the
  directory it is installed in. Relative paths are taken from the
  directory the launcher was started in.
",
                ),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .long_help(
                    "Print the resolved launch as JSON on stdout instead of running it.
",
                ),
        )
        .arg(
            Arg::new("workdir")
                .required(true)
                .value_name("WORKDIR")
                .value_parser(value_parser!(OsString))
                .help("The directory the script runs in."),
        )
        .arg(
            Arg::new(RESOLVED_PATHS[0])
                .required(true)
                .value_name("PATH1")
                .value_parser(value_parser!(OsString))
                .help("The script to run. Made absolute before changing directory."),
        )
        .arg(
            Arg::new(RESOLVED_PATHS[1])
                .required(true)
                .value_name("PATH2")
                .value_parser(value_parser!(OsString))
                .help("Made absolute before changing directory."),
        )
        .arg(
            Arg::new(RESOLVED_PATHS[2])
                .required(true)
                .value_name("PATH3")
                .value_parser(value_parser!(OsString))
                .help("Made absolute before changing directory."),
        )
        .arg(
            Arg::new("extra")
                .value_name("EXTRA")
                .num_args(0..)
                .allow_hyphen_values(true)
                .value_parser(value_parser!(OsString))
                .help("Passed through to the script unchanged."),
        )
}

/// How many of the following command line items a launcher option consumes.
///
/// Returns [`None`] if `item` is not a launcher option, which makes it the
/// first positional argument.
fn option_width(cmd: &Command, item: &OsStr) -> Option<usize> {
    let item = item.to_str()?;
    if let Some(long) = item.strip_prefix("--") {
        let (name, attached) = match long.split_once('=') {
            Some((name, _)) => (name, true),
            None => (long, false),
        };
        let arg = cmd.get_arguments().find(|a| a.get_long() == Some(name))?;
        let takes_value = arg.get_action().takes_values();
        return Some(if takes_value && !attached { 2 } else { 1 });
    }
    let shorts = item.strip_prefix('-')?;
    if shorts.is_empty() {
        // a lone `-` (ie stdin) is a value
        return None;
    }
    for (index, c) in shorts.char_indices() {
        let arg = cmd.get_arguments().find(|a| a.get_short() == Some(c))?;
        if arg.get_action().takes_values() {
            let attached = index + c.len_utf8() < shorts.len();
            return Some(if attached { 1 } else { 2 });
        }
    }
    Some(1)
}

/// Rewrite `args` so that clap only sees launcher options as options.
///
/// Leading launcher options are kept as they are. An explicit `--` ending them is
/// dropped, and a `--` is inserted before the first positional so every later item
/// is taken verbatim.
pub fn split_args(cmd: &Command, args: Vec<OsString>) -> Vec<OsString> {
    let mut rewritten = Vec::with_capacity(args.len() + 1);
    let mut items = args.into_iter();
    if let Some(program) = items.next() {
        rewritten.push(program);
    }
    let mut items = items.peekable();
    while let Some(item) = items.peek() {
        if item == "--" {
            items.next();
            break;
        }
        let Some(width) = option_width(cmd, item) else {
            break;
        };
        rewritten.extend(items.by_ref().take(width));
    }
    rewritten.push(OsString::from("--"));
    rewritten.extend(items);
    rewritten
}

/// Parse `args` (including the program name) with [`get_arg_parser`].
pub fn parse_args(args: Vec<OsString>) -> Result<ArgMatches, clap::Error> {
    let mut cmd = get_arg_parser();
    // populate the auto-generated `--help` so `split_args` recognizes it
    cmd.build();
    let args = split_args(&cmd, args);
    cmd.try_get_matches_from(args)
}

/// The positional part of a parsed command line.
#[derive(Debug, PartialEq, Eq)]
pub struct Positionals {
    /// The directory the launched process starts in.
    pub workdir: PathBuf,

    /// The three arguments that get made absolute.
    pub paths: [PathBuf; 3],

    /// Everything after the third path.
    pub extra: Vec<OsString>,
}

/// Collect the positional arguments from already-validated `args`.
///
/// Returns [`None`] only if `args` did not come from [`get_arg_parser`].
pub fn get_positionals(args: &ArgMatches) -> Option<Positionals> {
    // read as `OsString` since clap's `PathBuf` parser rejects empty values
    let workdir = PathBuf::from(args.get_one::<OsString>("workdir")?);
    let mut paths: [PathBuf; 3] = Default::default();
    for (slot, id) in paths.iter_mut().zip(RESOLVED_PATHS) {
        *slot = PathBuf::from(args.get_one::<OsString>(id)?);
    }
    let extra = args
        .get_many::<OsString>("extra")
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default();
    Some(Positionals {
        workdir,
        paths,
        extra,
    })
}

#[cfg(test)]
mod test {
    use super::{get_positionals, parse_args, Positionals};
    use std::ffi::OsString;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Result<clap::ArgMatches, clap::Error> {
        let mut argv = vec![OsString::from("postproc-launcher")];
        argv.extend(args.iter().map(OsString::from));
        parse_args(argv)
    }

    fn positionals(args: &[&str]) -> Positionals {
        get_positionals(&parse(args).unwrap()).unwrap()
    }

    fn extra(args: &[&str]) -> Vec<OsString> {
        positionals(args).extra
    }

    #[test]
    fn passthrough_keeps_hyphenated_values() {
        let positionals = positionals(&[
            "/tmp/build",
            "a.py",
            "b.txt",
            "c.txt",
            "--flag",
            "-x",
            "value",
        ]);
        assert_eq!(positionals.workdir, PathBuf::from("/tmp/build"));
        assert_eq!(
            positionals.paths,
            ["a.py", "b.txt", "c.txt"].map(PathBuf::from)
        );
        assert_eq!(positionals.extra, ["--flag", "-x", "value"]);
    }

    #[test]
    fn passthrough_keeps_launcher_options() {
        let base = ["w", "a", "b", "c"];
        for first in ["-h", "--help", "-n", "--dry-run", "-v", "--", "-"] {
            let mut args = base.to_vec();
            args.extend([first, "x"]);
            let matches = parse(&args).unwrap();
            assert!(!matches.get_flag("dry-run"), "{first} set dry-run");
            assert_eq!(
                matches.get_one::<String>("verbosity").unwrap(),
                "info",
                "{first} set verbosity"
            );
            assert_eq!(get_positionals(&matches).unwrap().extra, [first, "x"]);
        }
        assert_eq!(
            extra(&["w", "a", "b", "c", "--interpreter-version", "3", "--"]),
            ["--interpreter-version", "3", "--"]
        );
    }

    #[test]
    fn hyphenated_positionals() {
        let positionals = positionals(&["-dir", "-a", "--b", "c"]);
        assert_eq!(positionals.workdir, PathBuf::from("-dir"));
        assert_eq!(positionals.paths, ["-a", "--b", "c"].map(PathBuf::from));
    }

    #[test]
    fn explicit_end_of_options() {
        let positionals = positionals(&["-n", "--", "-n", "a", "b", "c", "--"]);
        assert_eq!(positionals.workdir, PathBuf::from("-n"));
        assert_eq!(positionals.extra, ["--"]);
    }

    #[test]
    fn options_before_positionals() {
        let args = parse(&[
            "-v",
            "debug",
            "--interpreter-version=3.11",
            "-n",
            "out",
            "a",
            "b",
            "c",
        ])
        .unwrap();
        assert_eq!(args.get_one::<String>("verbosity").unwrap(), "debug");
        assert_eq!(
            args.get_one::<String>("interpreter-version").unwrap(),
            "3.11"
        );
        assert!(args.get_flag("dry-run"));
        assert!(get_positionals(&args).unwrap().extra.is_empty());
    }

    #[test]
    fn clustered_and_attached_shorts() {
        let args = parse(&["-nvdebug", "--interpreter-version", "3", "w", "a", "b", "c"]).unwrap();
        assert!(args.get_flag("dry-run"));
        assert_eq!(args.get_one::<String>("verbosity").unwrap(), "debug");
        assert_eq!(args.get_one::<String>("interpreter-version").unwrap(), "3");
        assert_eq!(get_positionals(&args).unwrap().workdir, PathBuf::from("w"));
    }

    #[test]
    fn empty_path_accepted() {
        let positionals = positionals(&["w", "", "b", "c", ""]);
        assert_eq!(positionals.paths[0], PathBuf::new());
        assert_eq!(positionals.extra, [""]);
    }

    #[test]
    fn help_before_positionals() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn too_few_positionals() {
        let err = parse(&["out", "a", "b"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_arguments() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let script = OsStr::from_bytes(b"\xff.py");
        let argv = ["postproc-launcher", "w"]
            .map(OsString::from)
            .into_iter()
            .chain([script.to_os_string(), "b".into(), "c".into(), script.to_os_string()])
            .collect();
        let positionals = get_positionals(&parse_args(argv).unwrap()).unwrap();
        assert_eq!(positionals.paths[0].as_os_str(), script);
        assert_eq!(positionals.extra, [script.to_os_string()]);
    }
}
