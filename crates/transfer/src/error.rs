//! Error types for copy runs.
//!
//! Fatal conditions end the run through [`CopyError`]; each maps to an
//! [`ExitCode`]. A failure affecting a single file is a
//! [`FileTransferError`], recorded in the summary while the loop continues.

use std::io;
use std::path::PathBuf;

use filters::FilterError;
use remote::{ConnectionError, RemoteCommandError};
use thiserror::Error;
use walk::WalkError;

use crate::ExitCode;

/// Problems with the run's configuration, detected before connecting.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The source folder does not exist or cannot be inspected.
    #[error("source folder '{}' is not accessible: {source}", path.display())]
    SourceInaccessible {
        /// Source folder as configured.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The source folder is not a directory.
    #[error("source folder '{}' is not a directory", path.display())]
    SourceNotFolder {
        /// Source folder as configured.
        path: PathBuf,
    },

    /// No ready timeout was configured.
    #[error("a ready timeout is required")]
    MissingReadyTimeout,

    /// Neither a private key nor a password was supplied.
    #[error("no credentials supplied; pass an identity file or set a password")]
    MissingCredentials,

    /// The identity file could not be read.
    #[error("failed to read identity file '{}': {source}", path.display())]
    IdentityFile {
        /// Identity file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// A fatal error that ends a copy run.
#[derive(Debug, Error)]
pub enum CopyError {
    /// Invalid configuration.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The source tree could not be enumerated.
    #[error(transparent)]
    Walk(#[from] WalkError),

    /// A content pattern is not a valid glob.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// The session could not be established.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Cleaning the target folder failed.
    #[error("failed to clean target folder: {0}")]
    CleanTarget(#[source] RemoteCommandError),

    /// Nothing matched and an empty selection is fatal.
    #[error("no files matched the content patterns; nothing to copy")]
    EmptySource,

    /// Some files failed to upload.
    #[error("{failed} of {total} files failed to copy")]
    PartialTransfer {
        /// Number of failed files.
        failed: usize,
        /// Number of files attempted.
        total: usize,
    },
}

impl CopyError {
    /// Exit code reported for this error.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::Configuration(_) => ExitCode::Syntax,
            Self::Walk(_) | Self::Filter(_) | Self::EmptySource => ExitCode::FileSelect,
            Self::Connection(ConnectionError::ReadyTimeout { .. }) => ExitCode::ConnectionTimeout,
            Self::Connection(_) => ExitCode::StartClient,
            Self::CleanTarget(_) => ExitCode::CommandFailed,
            Self::PartialTransfer { .. } => ExitCode::PartialTransfer,
        }
    }
}

/// Why a single file was not copied.
#[derive(Debug, Error)]
pub enum FileTransferError {
    /// Overwriting is disabled and the target already exists.
    #[error("'{target}' already exists on the remote machine")]
    AlreadyExists {
        /// Remote path that exists.
        target: String,
    },

    /// The upload, or the existence check before it, failed.
    #[error(transparent)]
    Upload(#[from] ConnectionError),
}
