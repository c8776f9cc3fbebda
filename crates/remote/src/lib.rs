#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `remote` owns the SSH session used by a copy run. A
//! [`ConnectionManager`] opens a command connection and a transfer connection,
//! runs shell commands on the remote host, uploads single files, checks
//! whether remote paths exist, and tears every handle down again.
//!
//! # Design
//!
//! The manager never talks to SSH directly. Every remote primitive goes through
//! the [`RemoteTransport`] trait:
//!
//! - [`EmbeddedTransport`] implements it with `russh` and `russh-sftp`.
//! - Tests substitute a scripted double.
//!
//! The manager tracks the session state and which handles still need
//! releasing, so [`ConnectionManager::close`] can be called on every exit
//! path without double-closing anything.
//!
//! # Invariants
//!
//! - Operations other than `open` fail with a not-set-up error until both
//!   connections are established.
//! - `close` attempts the stat, transfer and command handles in that order.
//!   A failure closing one handle is logged and never stops the others.
//! - Remote paths are plain `/`-separated strings.
//!
//! # Errors
//!
//! Collaborator failures surface as [`TransportError`] and are wrapped in
//! [`ConnectionError`] or [`RemoteCommandError`] by the manager.

mod config;
mod embedded;
mod error;
mod manager;
mod transport;

pub use config::{Credentials, DEFAULT_PORT, SshConfig};
pub use embedded::EmbeddedTransport;
pub use error::{ConnectionError, RemoteCommandError, TransportError};
pub use manager::{CommandOptions, CommandOutcome, ConnectionManager, SessionState, prepare_command};
pub use transport::{ExecEvent, RemoteHandle, RemoteTransport};
