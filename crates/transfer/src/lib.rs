#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
//! crates/transfer/src/lib.rs
//!
//! Copy runs: file selection handed to a remote session, one upload at a time.
//!
//! # Flow
//!
//! [`run_copy`] drives a run:
//!
//! 1. Checks the source folder and makes it absolute.
//! 2. Opens the session through a [`remote::ConnectionManager`].
//! 3. Empties the target folder when `clean_target_folder` is set.
//! 4. Resolves the content patterns, enumerates the source tree and selects
//!    the files to copy.
//! 5. Handles an empty selection, as a warning or as a fatal error.
//! 6. Copies each file with [`transfer_files`], recording a [`FileReport`].
//! 7. Closes the session, whatever happened in steps 3 to 6.
//!
//! # Errors
//!
//! Fatal conditions are [`CopyError`] values, each carrying an [`ExitCode`].
//! A file that fails to copy is recorded as a [`FileTransferError`] and the
//! loop continues; any such failure makes the run end with
//! [`CopyError::PartialTransfer`].
//!
//! # Paths
//!
//! Remote paths are `/`-separated strings built with
//! [`filters::slash_path::join`], so a Windows source still produces POSIX
//! targets.

mod config;
mod error;
mod exit_code;
mod mapping;
mod orchestrator;
mod run;
mod summary;

pub use config::{CopyConfig, CopyOptions, TargetFolder};
pub use error::{ConfigurationError, CopyError, FileTransferError};
pub use exit_code::ExitCode;
pub use mapping::TargetMapping;
pub use orchestrator::{clean_command, clean_target_folder, transfer_files};
pub use run::{run_copy, select_source_files};
pub use summary::{FileReport, TransferOutcome, TransferSummary};
