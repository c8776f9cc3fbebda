//! Command definition and argument parsing.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command, value_parser};
use logging::{Verbosity, VerbosityConfig};

/// Values recognised on the command line.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct ParsedArgs {
    pub(crate) source_folder: PathBuf,
    pub(crate) contents: Vec<String>,
    pub(crate) target_folder: Option<String>,
    pub(crate) clean_target_folder: bool,
    pub(crate) overwrite: bool,
    pub(crate) fail_on_empty_source: bool,
    pub(crate) flatten_folders: bool,
    pub(crate) ready_timeout: Option<u64>,
    pub(crate) host: String,
    pub(crate) port: Option<u16>,
    pub(crate) user: String,
    pub(crate) identity_file: Option<PathBuf>,
    pub(crate) verbose: u8,
    pub(crate) quiet: bool,
    pub(crate) log_config: VerbosityConfig,
}

impl ParsedArgs {
    pub(crate) const fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::from_verbose_level(self.verbose)
        }
    }
}

/// Builds the `clap` command used for parsing.
pub(crate) fn clap_command() -> Command {
    Command::new("sshcopy")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Copy files selected by glob patterns to a remote host over SSH.")
        .arg(
            Arg::new("source-folder")
                .long("source-folder")
                .value_name("DIR")
                .help("Local folder the content patterns are resolved against.")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("contents")
                .long("contents")
                .value_name("PATTERNS")
                .help("Glob patterns, one per line; prefix with '!' to exclude. Defaults to '**'.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("target-folder")
                .long("target-folder")
                .value_name("DIR")
                .help("Remote destination folder (default: the login directory).")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("clean-target-folder")
                .long("clean-target-folder")
                .help("Remove the target folder's contents before copying.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .help("Replace files that already exist on the remote host (default).")
                .action(ArgAction::SetTrue)
                .overrides_with("no-overwrite"),
        )
        .arg(
            Arg::new("no-overwrite")
                .long("no-overwrite")
                .help("Fail files whose target already exists.")
                .action(ArgAction::SetTrue)
                .overrides_with("overwrite"),
        )
        .arg(
            Arg::new("fail-on-empty-source")
                .long("fail-on-empty-source")
                .help("Fail when no file matches the content patterns.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("flatten-folders")
                .long("flatten-folders")
                .help("Upload every file directly into the target folder.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ready-timeout")
                .long("ready-timeout")
                .value_name("SECONDS")
                .help("Time each SSH connection may take to become ready.")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Remote host name or address.")
                .required(true),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .value_name("PORT")
                .help("Remote SSH port (default: 22).")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .value_name("USER")
                .help("Login name on the remote host.")
                .required(true),
        )
        .arg(
            Arg::new("identity-file")
                .long("identity-file")
                .value_name("PATH")
                .help("Private key file; SSHCOPY_PASSWORD then holds its passphrase.")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase logging verbosity; repeat for more.")
                .action(ArgAction::Count)
                .conflicts_with("quiet"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log errors.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .value_name("TARGET=LEVEL")
                .help(
                    "Set the level of one log target (filter, flist, connect, cmd, copy, \
                     stats); repeatable.",
                )
                .action(ArgAction::Append),
        )
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
pub(crate) fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();

    if args.is_empty() {
        args.push(OsString::from("sshcopy"));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    let contents = matches
        .remove_many::<String>("contents")
        .map(split_contents)
        .unwrap_or_default();

    let log_tokens: Vec<String> = matches
        .remove_many::<String>("log")
        .map(Iterator::collect)
        .unwrap_or_default();

    let mut parsed = ParsedArgs {
        source_folder: matches.remove_one("source-folder").unwrap_or_default(),
        contents,
        target_folder: matches.remove_one("target-folder"),
        clean_target_folder: matches.get_flag("clean-target-folder"),
        overwrite: !matches.get_flag("no-overwrite"),
        fail_on_empty_source: matches.get_flag("fail-on-empty-source"),
        flatten_folders: matches.get_flag("flatten-folders"),
        ready_timeout: matches.remove_one("ready-timeout"),
        host: matches.remove_one("host").unwrap_or_default(),
        port: matches.remove_one("port"),
        user: matches.remove_one("user").unwrap_or_default(),
        identity_file: matches.remove_one("identity-file"),
        verbose: matches.get_count("verbose"),
        quiet: matches.get_flag("quiet"),
        log_config: VerbosityConfig::default(),
    };

    parsed.log_config = VerbosityConfig::new(parsed.verbosity());
    for token in &log_tokens {
        parsed
            .log_config
            .apply_token(token)
            .map_err(|message| clap_command().error(ErrorKind::ValueValidation, message))?;
    }
    Ok(parsed)
}

/// Splits multi-line `--contents` values into trimmed, non-blank patterns.
pub(crate) fn split_contents<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .flat_map(|value| {
            value
                .as_ref()
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect::<Vec<_>>()
        })
        .collect()
}
