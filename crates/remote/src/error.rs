//! Error types for remote-session operations.

use crate::{RemoteHandle, SessionState};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a [`RemoteTransport`](crate::RemoteTransport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// SSH protocol or network failure.
    #[error("ssh: {0}")]
    Ssh(#[from] russh::Error),

    /// SFTP request failure.
    #[error("sftp: {0}")]
    Sftp(#[from] russh_sftp::client::error::Error),

    /// The private key could not be decoded.
    #[error("invalid private key: {0}")]
    Key(#[from] russh::keys::Error),

    /// The server refused every offered credential.
    #[error("authentication rejected for user '{user}'")]
    AuthenticationRejected {
        /// Login name that was rejected.
        user: String,
    },

    /// The operation needs a handle that is not open.
    #[error("{handle} handle is not open")]
    HandleNotOpen {
        /// Missing handle.
        handle: RemoteHandle,
    },

    /// Local I/O failure while reading a file to upload.
    #[error("{}: {source}", path.display())]
    Io {
        /// Local path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Any other failure, described by a message.
    #[error("{0}")]
    Other(String),
}

/// Failure establishing or using the session.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// A connection could not be established.
    #[error("failed to connect to {host}:{port} ({handle} connection): {source}")]
    Connect {
        /// Remote host.
        host: String,
        /// Remote port.
        port: u16,
        /// Connection that failed.
        handle: RemoteHandle,
        /// Underlying error.
        #[source]
        source: TransportError,
    },

    /// A connection did not become ready in time.
    #[error(
        "timed out after {}s waiting for {host}:{port} ({handle} connection)",
        timeout.as_secs()
    )]
    ReadyTimeout {
        /// Remote host.
        host: String,
        /// Remote port.
        port: u16,
        /// Connection that timed out.
        handle: RemoteHandle,
        /// Configured ready timeout.
        timeout: Duration,
    },

    /// `open` was called on a session that is not disconnected.
    #[error("cannot open a session that is {state}")]
    InvalidState {
        /// State at the time of the call.
        state: SessionState,
    },

    /// The operation was attempted before the session was ready.
    #[error("connection is not set up")]
    NotSetup,

    /// A file could not be uploaded.
    #[error("failed to upload '{}' to '{target}': {source}", source_path.display())]
    Upload {
        /// Local file.
        source_path: PathBuf,
        /// Remote destination.
        target: String,
        /// Underlying error.
        #[source]
        source: TransportError,
    },
}

/// Failure running a remote shell command.
#[derive(Debug, Error)]
pub enum RemoteCommandError {
    /// The command was attempted before the session was ready.
    #[error("connection is not set up")]
    NotSetup,

    /// The command could not be started.
    #[error("failed to run '{command}': {source}")]
    Execution {
        /// Command as sent to the remote shell.
        command: String,
        /// Underlying error.
        #[source]
        source: TransportError,
    },

    /// The command exited with a non-zero status.
    #[error("command '{command}' exited with code {code}")]
    NonZeroExit {
        /// Command as sent to the remote shell.
        command: String,
        /// Exit status.
        code: u32,
    },

    /// The command wrote to standard error while that is treated as failure.
    #[error("command '{command}' wrote to standard error; check the log for details")]
    Stderr {
        /// Command as sent to the remote shell.
        command: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn upload_error_names_both_paths() {
        let error = ConnectionError::Upload {
            source_path: PathBuf::from("/src/a.txt"),
            target: "./a.txt".to_owned(),
            source: TransportError::Other("permission denied".to_owned()),
        };
        assert_eq!(
            error.to_string(),
            "failed to upload '/src/a.txt' to './a.txt': permission denied"
        );
        assert!(error.source().is_some());
    }

    #[test]
    fn timeout_reports_seconds() {
        let error = ConnectionError::ReadyTimeout {
            host: "example.org".to_owned(),
            port: 22,
            handle: RemoteHandle::Command,
            timeout: Duration::from_secs(20),
        };
        assert_eq!(
            error.to_string(),
            "timed out after 20s waiting for example.org:22 (command connection)"
        );
    }

    #[test]
    fn non_zero_exit_reports_code() {
        let error = RemoteCommandError::NonZeroExit {
            command: "false".to_owned(),
            code: 1,
        };
        assert_eq!(error.to_string(), "command 'false' exited with code 1");
    }
}
