use crate::{SshConfig, TransportError};
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use tokio::sync::mpsc;

/// One of the three independently closable handles of a session.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RemoteHandle {
    /// Connection used for remote shell commands.
    Command,
    /// Connection carrying file uploads.
    Transfer,
    /// File-system queries on the transfer connection.
    Stat,
}

impl RemoteHandle {
    /// Order in which handles are released.
    pub const CLOSE_ORDER: [Self; 3] = [Self::Stat, Self::Transfer, Self::Command];

    /// Lowercase name used in log and error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Transfer => "transfer",
            Self::Stat => "stat",
        }
    }
}

impl fmt::Display for RemoteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a running remote command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExecEvent {
    /// Bytes written to standard output.
    Stdout(Vec<u8>),
    /// Bytes written to standard error.
    Stderr(Vec<u8>),
    /// The command finished. Either field may be absent.
    Closed {
        /// Exit status reported by the remote shell.
        exit_code: Option<u32>,
        /// Signal that terminated the command.
        signal: Option<String>,
    },
}

/// Remote-session primitives consumed by [`ConnectionManager`].
///
/// Implementations hold the live connections; the manager decides when each
/// primitive may be called. Closing a handle that was never opened, or was
/// already closed, must succeed without doing anything.
///
/// [`ConnectionManager`]: crate::ConnectionManager
#[async_trait]
pub trait RemoteTransport: Send {
    /// Establishes the authenticated command connection.
    async fn connect_command(&mut self, config: &SshConfig) -> Result<(), TransportError>;

    /// Establishes the transfer connection and its stat handle.
    async fn connect_transfer(&mut self, config: &SshConfig) -> Result<(), TransportError>;

    /// Starts `command` on the command connection.
    ///
    /// The receiver yields output as it arrives and ends with
    /// [`ExecEvent::Closed`].
    async fn execute(&mut self, command: &str)
    -> Result<mpsc::Receiver<ExecEvent>, TransportError>;

    /// Copies the local file at `source` to `target`, creating missing
    /// parent directories.
    async fn upload(&mut self, source: &Path, target: &str) -> Result<(), TransportError>;

    /// Queries `path`; any error means the path cannot be confirmed to exist.
    async fn stat(&mut self, path: &str) -> Result<(), TransportError>;

    /// Releases `handle`.
    async fn close(&mut self, handle: RemoteHandle) -> Result<(), TransportError>;
}
