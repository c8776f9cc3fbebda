#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the command-line front-end of sshcopy. It parses the flags with a
//! [`clap`](https://docs.rs/clap/) builder, installs logging, builds a
//! [`transfer::CopyConfig`] and a [`remote::SshConfig`], and runs
//! [`transfer::run_copy`] on a current-thread tokio runtime with the russh
//! backend.
//!
//! # Errors
//!
//! Usage errors exit with `1`. Every other failure is printed on standard
//! error and exits with [`transfer::CopyError::exit_code`].
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = cli::run(["sshcopy", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(!stdout.is_empty());
//! assert!(stderr.is_empty());
//! ```

use std::ffi::OsString;
use std::io::Write;

use clap::error::ErrorKind;
use remote::EmbeddedTransport;
use transfer::{CopyError, ExitCode, run_copy};

mod arguments;
mod settings;

#[cfg(test)]
mod tests;

use arguments::{ParsedArgs, parse_args};

/// Environment variable holding the password or key passphrase.
pub const PASSWORD_ENV: &str = "SSHCOPY_PASSWORD";

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Runs the CLI using the provided argument iterator and output handles.
///
/// Returns the process exit code.
#[allow(clippy::module_name_repetitions)]
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(&parsed, std::env::var(PASSWORD_ENV).ok(), stderr),
        Err(error) if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = write!(stdout, "{}", error.render());
            ExitCode::Ok.as_i32()
        }
        Err(error) => {
            let _ = write!(stderr, "{}", error.render());
            ExitCode::Syntax.as_i32()
        }
    }
}

fn execute<Err: Write>(parsed: &ParsedArgs, password: Option<String>, stderr: &mut Err) -> i32 {
    logging::init_tracing(&parsed.log_config);

    let config = settings::copy_config(parsed);
    let ssh = match settings::ssh_config(parsed, password) {
        Ok(ssh) => ssh,
        Err(error) => return report(&CopyError::from(error), stderr),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            let _ = writeln!(stderr, "sshcopy: failed to start the async runtime: {error}");
            return ExitCode::StartClient.as_i32();
        }
    };

    match runtime.block_on(run_copy(&config, &ssh, EmbeddedTransport::new())) {
        Ok(_) => ExitCode::Ok.as_i32(),
        Err(error) => report(&error, stderr),
    }
}

fn report<Err: Write>(error: &CopyError, stderr: &mut Err) -> i32 {
    let code = error.exit_code();
    let _ = writeln!(stderr, "sshcopy: {error} (code {})", code.as_i32());
    code.as_i32()
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}
