use crate::{
    ConnectionError, ExecEvent, RemoteCommandError, RemoteHandle, RemoteTransport, SshConfig,
    TransportError,
};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::path::Path;
use tracing::{debug, error, info};

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionState {
    /// Nothing usable is open.
    Disconnected,
    /// `open` is in progress.
    Connecting,
    /// Both connections are established.
    Ready,
    /// `close` has run.
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Ready => "ready",
            Self::Closed => "closed",
        })
    }
}

/// Options for [`ConnectionManager::execute_remote_command`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CommandOptions {
    /// Treat any output on standard error as a failure.
    pub fail_on_stderr: bool,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            fail_on_stderr: true,
        }
    }
}

/// How a successful remote command finished.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandOutcome {
    /// Exit status, when the remote side reported one.
    pub exit_code: Option<u32>,
    /// Terminating signal, when the remote side reported one.
    pub signal: Option<String>,
    /// Whether anything was written to standard error.
    pub stderr_written: bool,
}

/// Rewrites a `;`-separated command list into one command per line.
///
/// Only applies when the first `;` is not the first character.
///
/// ```
/// use remote::prepare_command;
///
/// assert_eq!(prepare_command("cd /srv;ls"), "cd /srv\nls");
/// assert_eq!(prepare_command(";ls"), ";ls");
/// assert_eq!(prepare_command("ls"), "ls");
/// ```
pub fn prepare_command(command: &str) -> Cow<'_, str> {
    match command.find(';') {
        Some(index) if index > 0 => Cow::Owned(command.replace(';', "\n")),
        _ => Cow::Borrowed(command),
    }
}

/// Owns the lifecycle of one remote session.
///
/// The manager is created per run, opened once and closed exactly once.
/// Closing is safe on every path: handles that were never opened are
/// released as no-ops, and a second `close` does nothing.
pub struct ConnectionManager<T> {
    transport: T,
    state: SessionState,
    released: HashSet<RemoteHandle>,
}

impl<T: RemoteTransport> ConnectionManager<T> {
    /// Wraps `transport` in a disconnected session.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: SessionState::Disconnected,
            released: HashSet::new(),
        }
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// The underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Establishes the command connection, then the transfer connection.
    ///
    /// Each connection must become ready within the configured ready
    /// timeout. When either fails the session returns to
    /// [`SessionState::Disconnected`]; anything partially opened is released
    /// by [`close`](Self::close).
    pub async fn open(&mut self, config: &SshConfig) -> Result<(), ConnectionError> {
        if self.state != SessionState::Disconnected {
            return Err(ConnectionError::InvalidState { state: self.state });
        }

        info!(
            target: "sshcopy::connect",
            "setting up SSH connection to {}:{}",
            config.host(),
            config.port()
        );
        self.state = SessionState::Connecting;

        let result = self.establish(config).await;
        self.state = match result {
            Ok(()) => SessionState::Ready,
            Err(_) => SessionState::Disconnected,
        };
        result
    }

    async fn establish(&mut self, config: &SshConfig) -> Result<(), ConnectionError> {
        connect_within(
            config,
            RemoteHandle::Command,
            self.transport.connect_command(config),
        )
        .await?;
        debug!(target: "sshcopy::connect", "command connection ready");
        connect_within(
            config,
            RemoteHandle::Transfer,
            self.transport.connect_transfer(config),
        )
        .await?;
        debug!(target: "sshcopy::connect", "transfer connection ready");
        Ok(())
    }

    /// Runs `command` on the remote host and waits for it to finish.
    ///
    /// A `;` list is sent one command per line (see [`prepare_command`]).
    /// Standard output is logged at info level, non-blank standard error at
    /// error level. The command fails on a non-zero exit status, or when
    /// standard error received data and `options.fail_on_stderr` is set. A
    /// command that reports no exit status counts as successful.
    pub async fn execute_remote_command(
        &mut self,
        command: &str,
        options: CommandOptions,
    ) -> Result<CommandOutcome, RemoteCommandError> {
        if self.state != SessionState::Ready {
            return Err(RemoteCommandError::NotSetup);
        }

        let command = prepare_command(command).into_owned();
        debug!(target: "sshcopy::cmd", "running remote command: {command}");

        let mut events = self.transport.execute(&command).await.map_err(|source| {
            RemoteCommandError::Execution {
                command: command.clone(),
                source,
            }
        })?;

        let mut outcome = CommandOutcome::default();
        while let Some(event) = events.recv().await {
            match event {
                ExecEvent::Stdout(data) => {
                    info!(target: "sshcopy::cmd", "{}", String::from_utf8_lossy(&data).trim_end());
                }
                ExecEvent::Stderr(data) => {
                    outcome.stderr_written = true;
                    let text = String::from_utf8_lossy(&data);
                    debug!(target: "sshcopy::cmd", "stderr = {text}");
                    if !text.trim().is_empty() {
                        error!(target: "sshcopy::cmd", "{}", text.trim_end());
                    }
                }
                ExecEvent::Closed { exit_code, signal } => {
                    outcome.exit_code = exit_code;
                    outcome.signal = signal;
                    break;
                }
            }
        }

        debug!(
            target: "sshcopy::cmd",
            "code = {:?}, signal = {:?}",
            outcome.exit_code,
            outcome.signal
        );

        if let Some(code) = outcome.exit_code.filter(|code| *code != 0) {
            return Err(RemoteCommandError::NonZeroExit { command, code });
        }
        if outcome.stderr_written && options.fail_on_stderr {
            return Err(RemoteCommandError::Stderr { command });
        }
        Ok(outcome)
    }

    /// Uploads one local file to `target`, creating remote directories as
    /// needed.
    pub async fn upload_file(&mut self, source: &Path, target: &str) -> Result<(), ConnectionError> {
        if self.state != SessionState::Ready {
            return Err(ConnectionError::NotSetup);
        }

        debug!(
            target: "sshcopy::copy",
            "upload {} to {} on remote machine",
            source.display(),
            target
        );
        self.transport
            .upload(source, target)
            .await
            .map_err(|error| ConnectionError::Upload {
                source_path: source.to_path_buf(),
                target: target.to_owned(),
                source: error,
            })
    }

    /// Reports whether `path` exists on the remote host.
    ///
    /// Any stat failure, not only "not found", is reported as `false`.
    pub async fn path_exists(&mut self, path: &str) -> Result<bool, ConnectionError> {
        if self.state != SessionState::Ready {
            return Err(ConnectionError::NotSetup);
        }

        match self.transport.stat(path).await {
            Ok(()) => Ok(true),
            Err(error) => {
                debug!(target: "sshcopy::copy", "stat {path} failed: {error}");
                Ok(false)
            }
        }
    }

    /// Releases the stat, transfer and command handles in that order.
    ///
    /// Each handle is closed in its own failure boundary; errors are logged
    /// at debug level and never returned. A handle is released at most once
    /// over the lifetime of the manager.
    pub async fn close(&mut self) {
        for handle in RemoteHandle::CLOSE_ORDER {
            if !self.released.insert(handle) {
                continue;
            }
            match self.transport.close(handle).await {
                Ok(()) => debug!(target: "sshcopy::connect", "closed {handle} handle"),
                Err(error) => debug!(
                    target: "sshcopy::connect",
                    "ignoring error closing {handle} handle: {error}"
                ),
            }
        }
        self.state = SessionState::Closed;
    }
}

impl<T> fmt::Debug for ConnectionManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("state", &self.state)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

async fn connect_within<F>(
    config: &SshConfig,
    handle: RemoteHandle,
    connect: F,
) -> Result<(), ConnectionError>
where
    F: Future<Output = Result<(), TransportError>>,
{
    match tokio::time::timeout(config.ready_timeout(), connect).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) => Err(ConnectionError::Connect {
            host: config.host().to_owned(),
            port: config.port(),
            handle,
            source,
        }),
        Err(_elapsed) => Err(ConnectionError::ReadyTimeout {
            host: config.host().to_owned(),
            port: config.port(),
            handle,
            timeout: config.ready_timeout(),
        }),
    }
}
