//! Process exit codes.
//!
//! The numeric values follow rsync's `errcode.h`, so scripts that already
//! interpret rsync failures read these the same way.
//!
//! # Examples
//!
//! ```
//! use transfer::ExitCode;
//!
//! let code = ExitCode::PartialTransfer;
//! assert_eq!(code.as_i32(), 23);
//! assert_eq!(code.description(), "partial transfer");
//! ```

use std::fmt;

/// Exit codes returned by `sshcopy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    /// Every selected file was uploaded (RERR_OK = 0).
    Ok = 0,

    /// Syntax or usage error (RERR_SYNTAX = 1).
    ///
    /// Invalid arguments, an unusable source folder, a missing ready timeout
    /// or missing credentials.
    Syntax = 1,

    /// Errors selecting input files (RERR_FILESELECT = 3).
    ///
    /// The source tree could not be enumerated, a pattern was invalid, or
    /// nothing matched while an empty selection is fatal.
    FileSelect = 3,

    /// Error starting the remote session (RERR_STARTCLIENT = 5).
    StartClient = 5,

    /// One or more files failed to upload (RERR_PARTIAL = 23).
    PartialTransfer = 23,

    /// The remote host did not become ready in time (RERR_CONTIMEOUT = 35).
    ConnectionTimeout = 35,

    /// A remote command failed (RERR_CMD_FAILED = 124).
    CommandFailed = 124,
}

impl ExitCode {
    /// Numeric process status.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Short description, also used by `Display`.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::Syntax => "syntax or usage error",
            Self::FileSelect => "errors selecting input/output files, dirs",
            Self::StartClient => "error starting remote session",
            Self::PartialTransfer => "partial transfer",
            Self::ConnectionTimeout => "timeout waiting for remote connection",
            Self::CommandFailed => "remote command failed",
        }
    }

    /// `true` only for [`ExitCode::Ok`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
