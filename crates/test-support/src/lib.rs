#![deny(unsafe_code)]

//! Shared fixtures for sshcopy tests.
//!
//! [`MockTransport`] is a scripted [`RemoteTransport`] that records every call.
//! Clones share state, so a test can keep one clone for inspection after
//! handing another to a `ConnectionManager`. [`SourceTree`] builds a
//! temporary source folder from a list of relative file names.

use async_trait::async_trait;
use remote::{ExecEvent, RemoteHandle, RemoteTransport, SshConfig, TransportError};
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// A primitive invoked on a [`MockTransport`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    /// `connect_command`.
    ConnectCommand,
    /// `connect_transfer`.
    ConnectTransfer,
    /// `execute` with the command as received.
    Execute(String),
    /// `upload`.
    Upload {
        /// Local file.
        source: PathBuf,
        /// Remote destination.
        target: String,
    },
    /// `stat`.
    Stat(String),
    /// `close`.
    Close(RemoteHandle),
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<Call>,
    failing_connect: Option<RemoteHandle>,
    connect_delay: Option<Duration>,
    failing_execute: bool,
    exec_scripts: VecDeque<Vec<ExecEvent>>,
    failing_uploads: HashSet<String>,
    existing: HashSet<String>,
    failing_closes: HashSet<RemoteHandle>,
}

/// Scripted, call-recording transport.
///
/// By default every primitive succeeds, commands exit with status 0 and no
/// remote path exists. Successful uploads make their target exist.
#[derive(Clone, Debug, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Creates a transport where everything succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the connection for `handle` fail.
    ///
    /// [`RemoteHandle::Stat`] is opened with the transfer connection, so
    /// failing it fails `connect_transfer`.
    #[must_use]
    pub fn failing_connect(self, handle: RemoteHandle) -> Self {
        self.state().failing_connect = Some(handle);
        self
    }

    /// Delays every connection attempt.
    #[must_use]
    pub fn connect_delay(self, delay: Duration) -> Self {
        self.state().connect_delay = Some(delay);
        self
    }

    /// Makes `execute` fail before the command starts.
    #[must_use]
    pub fn failing_execute(self) -> Self {
        self.state().failing_execute = true;
        self
    }

    /// Queues the events produced by the next `execute` call.
    #[must_use]
    pub fn script_exec(self, events: Vec<ExecEvent>) -> Self {
        self.state().exec_scripts.push_back(events);
        self
    }

    /// Makes uploads to `target` fail.
    #[must_use]
    pub fn failing_upload(self, target: impl Into<String>) -> Self {
        self.state().failing_uploads.insert(target.into());
        self
    }

    /// Marks `path` as present on the remote host.
    #[must_use]
    pub fn existing_path(self, path: impl Into<String>) -> Self {
        self.state().existing.insert(path.into());
        self
    }

    /// Makes closing `handle` fail.
    #[must_use]
    pub fn failing_close(self, handle: RemoteHandle) -> Self {
        self.state().failing_closes.insert(handle);
        self
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Commands passed to `execute`, in order.
    pub fn executed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Execute(command) => Some(command),
                _ => None,
            })
            .collect()
    }

    /// Upload targets attempted, in order, failed ones included.
    pub fn upload_targets(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Upload { target, .. } => Some(target),
                _ => None,
            })
            .collect()
    }

    /// Paths passed to `stat`, in order.
    pub fn stat_paths(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Stat(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    /// Handles passed to `close`, in order.
    pub fn closed_handles(&self) -> Vec<RemoteHandle> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Close(handle) => Some(handle),
                _ => None,
            })
            .collect()
    }

    async fn connect(&self, call: Call, fails: bool) -> Result<(), TransportError> {
        let delay = {
            let mut state = self.state();
            state.calls.push(call);
            state.connect_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fails {
            return Err(TransportError::Other("connection refused".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteTransport for MockTransport {
    async fn connect_command(&mut self, _config: &SshConfig) -> Result<(), TransportError> {
        let fails = self.state().failing_connect == Some(RemoteHandle::Command);
        self.connect(Call::ConnectCommand, fails).await
    }

    async fn connect_transfer(&mut self, _config: &SshConfig) -> Result<(), TransportError> {
        let fails = matches!(
            self.state().failing_connect,
            Some(RemoteHandle::Transfer | RemoteHandle::Stat)
        );
        self.connect(Call::ConnectTransfer, fails).await
    }

    async fn execute(
        &mut self,
        command: &str,
    ) -> Result<mpsc::Receiver<ExecEvent>, TransportError> {
        let (failing, script) = {
            let mut state = self.state();
            state.calls.push(Call::Execute(command.to_owned()));
            (state.failing_execute, state.exec_scripts.pop_front())
        };
        if failing {
            return Err(TransportError::Other("channel open failed".to_owned()));
        }

        let events = script.unwrap_or_else(|| {
            vec![ExecEvent::Closed {
                exit_code: Some(0),
                signal: None,
            }]
        });
        let (sender, receiver) = mpsc::channel(events.len().max(1));
        for event in events {
            sender
                .try_send(event)
                .map_err(|error| TransportError::Other(error.to_string()))?;
        }
        Ok(receiver)
    }

    async fn upload(&mut self, source: &Path, target: &str) -> Result<(), TransportError> {
        let mut state = self.state();
        state.calls.push(Call::Upload {
            source: source.to_path_buf(),
            target: target.to_owned(),
        });
        if state.failing_uploads.contains(target) {
            return Err(TransportError::Other("permission denied".to_owned()));
        }
        state.existing.insert(target.to_owned());
        Ok(())
    }

    async fn stat(&mut self, path: &str) -> Result<(), TransportError> {
        let mut state = self.state();
        state.calls.push(Call::Stat(path.to_owned()));
        if state.existing.contains(path) {
            Ok(())
        } else {
            Err(TransportError::Other("no such file".to_owned()))
        }
    }

    async fn close(&mut self, handle: RemoteHandle) -> Result<(), TransportError> {
        let mut state = self.state();
        state.calls.push(Call::Close(handle));
        if state.failing_closes.contains(&handle) {
            return Err(TransportError::Other(format!("{handle} already gone")));
        }
        Ok(())
    }
}

/// A temporary source folder populated with small files.
#[derive(Debug)]
pub struct SourceTree {
    dir: TempDir,
}

impl SourceTree {
    /// Creates the folder and writes each relative `/`-separated file name,
    /// with its name as contents.
    pub fn with_files(files: &[&str]) -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        for name in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, name.as_bytes())?;
        }
        Ok(Self { dir })
    }

    /// Root of the tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a file in the tree.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
