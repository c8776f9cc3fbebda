//! `russh` backed implementation of [`RemoteTransport`].
//!
//! Two SSH connections are opened per session. The command connection runs
//! shell commands over session channels. The transfer connection carries an
//! SFTP subsystem that serves both uploads and stat queries.

use crate::{Credentials, ExecEvent, RemoteHandle, RemoteTransport, SshConfig, TransportError};
use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::keys::{PrivateKeyWithHashAlg, decode_secret_key};
use russh::{ChannelMsg, Disconnect};
use russh_sftp::client::SftpSession;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{debug, trace};

const EXEC_EVENT_BUFFER: usize = 64;
const EXTENDED_DATA_STDERR: u32 = 1;

/// Client handler that accepts every server host key.
#[derive(Debug)]
struct AcceptingHandler;

impl client::Handler for AcceptingHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// SSH transport built on `russh` and `russh-sftp`.
///
/// Host keys are not verified.
#[derive(Default)]
pub struct EmbeddedTransport {
    command: Option<Handle<AcceptingHandler>>,
    transfer: Option<Handle<AcceptingHandler>>,
    sftp: Option<SftpSession>,
}

impl EmbeddedTransport {
    /// Creates a transport with no open connections.
    pub fn new() -> Self {
        Self::default()
    }

    fn sftp(&self) -> Result<&SftpSession, TransportError> {
        self.sftp.as_ref().ok_or(TransportError::HandleNotOpen {
            handle: RemoteHandle::Stat,
        })
    }

    async fn create_parent_directories(&self, target: &str) -> Result<(), TransportError> {
        let sftp = self.sftp()?;
        for directory in parent_directories(target) {
            if !sftp.try_exists(directory.as_str()).await? {
                trace!(target: "sshcopy::copy", "creating remote directory {directory}");
                sftp.create_dir(directory.as_str()).await?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for EmbeddedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedTransport")
            .field("command", &self.command.is_some())
            .field("transfer", &self.transfer.is_some())
            .field("sftp", &self.sftp.is_some())
            .finish()
    }
}

#[async_trait]
impl RemoteTransport for EmbeddedTransport {
    async fn connect_command(&mut self, config: &SshConfig) -> Result<(), TransportError> {
        self.command = Some(connect_authenticated(config).await?);
        Ok(())
    }

    async fn connect_transfer(&mut self, config: &SshConfig) -> Result<(), TransportError> {
        let handle = self.transfer.insert(connect_authenticated(config).await?);
        let channel = handle.channel_open_session().await?;
        channel.request_subsystem(true, "sftp").await?;
        self.sftp = Some(SftpSession::new(channel.into_stream()).await?);
        Ok(())
    }

    async fn execute(
        &mut self,
        command: &str,
    ) -> Result<mpsc::Receiver<ExecEvent>, TransportError> {
        let handle = self.command.as_ref().ok_or(TransportError::HandleNotOpen {
            handle: RemoteHandle::Command,
        })?;
        let mut channel = handle.channel_open_session().await?;
        channel.exec(true, command).await?;

        let (sender, receiver) = mpsc::channel(EXEC_EVENT_BUFFER);
        tokio::spawn(async move {
            let mut exit_code = None;
            let mut signal = None;
            while let Some(message) = channel.wait().await {
                let event = match message {
                    ChannelMsg::Data { data } => ExecEvent::Stdout(data.to_vec()),
                    ChannelMsg::ExtendedData { data, ext } if ext == EXTENDED_DATA_STDERR => {
                        ExecEvent::Stderr(data.to_vec())
                    }
                    ChannelMsg::ExitStatus { exit_status } => {
                        exit_code = Some(exit_status);
                        continue;
                    }
                    ChannelMsg::ExitSignal { signal_name, .. } => {
                        signal = Some(format!("{signal_name:?}"));
                        continue;
                    }
                    ChannelMsg::Close => break,
                    _ => continue,
                };
                if sender.send(event).await.is_err() {
                    return;
                }
            }
            let _ = sender.send(ExecEvent::Closed { exit_code, signal }).await;
        });

        Ok(receiver)
    }

    async fn upload(&mut self, source: &Path, target: &str) -> Result<(), TransportError> {
        self.create_parent_directories(target).await?;

        let io_error = |source_error| TransportError::Io {
            path: source.to_path_buf(),
            source: source_error,
        };
        let mut local = tokio::fs::File::open(source).await.map_err(io_error)?;
        let mut remote = self.sftp()?.create(target).await?;
        let copied = tokio::io::copy(&mut local, &mut remote)
            .await
            .map_err(io_error)?;
        remote.shutdown().await.map_err(io_error)?;

        trace!(target: "sshcopy::copy", "wrote {copied} bytes to {target}");
        Ok(())
    }

    async fn stat(&mut self, path: &str) -> Result<(), TransportError> {
        self.sftp()?.metadata(path).await?;
        Ok(())
    }

    async fn close(&mut self, handle: RemoteHandle) -> Result<(), TransportError> {
        match handle {
            RemoteHandle::Stat => {
                if let Some(sftp) = self.sftp.take() {
                    sftp.close().await?;
                }
            }
            RemoteHandle::Transfer => {
                if let Some(connection) = self.transfer.take() {
                    disconnect(&connection).await?;
                }
            }
            RemoteHandle::Command => {
                if let Some(connection) = self.command.take() {
                    disconnect(&connection).await?;
                }
            }
        }
        Ok(())
    }
}

async fn connect_authenticated(
    config: &SshConfig,
) -> Result<Handle<AcceptingHandler>, TransportError> {
    let ssh_config = Arc::new(client::Config::default());
    let mut handle =
        client::connect(ssh_config, (config.host(), config.port()), AcceptingHandler).await?;

    let result = match config.credentials() {
        Credentials::PrivateKey { key, passphrase } => {
            let key = decode_secret_key(key, passphrase.as_deref().map(String::as_str))?;
            let hash = handle.best_supported_rsa_hash().await?.flatten();
            handle
                .authenticate_publickey(
                    config.username(),
                    PrivateKeyWithHashAlg::new(Arc::new(key), hash),
                )
                .await?
        }
        Credentials::Password(password) => {
            handle
                .authenticate_password(config.username(), password.as_str())
                .await?
        }
    };

    if !result.success() {
        return Err(TransportError::AuthenticationRejected {
            user: config.username().to_owned(),
        });
    }
    debug!(
        target: "sshcopy::connect",
        "authenticated as {} on {}:{}",
        config.username(),
        config.host(),
        config.port()
    );
    Ok(handle)
}

async fn disconnect(connection: &Handle<AcceptingHandler>) -> Result<(), TransportError> {
    connection
        .disconnect(Disconnect::ByApplication, "", "English")
        .await?;
    Ok(())
}

/// Lists the directories leading to `target`, shallowest first.
///
/// The file name itself is not included. An absolute target yields absolute
/// directories.
fn parent_directories(target: &str) -> Vec<String> {
    let Some((parent, _)) = target.rsplit_once('/') else {
        return Vec::new();
    };

    let mut directories = Vec::new();
    let mut current = String::new();
    if parent.starts_with('/') {
        current.push('/');
    }
    for segment in parent.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if !current.is_empty() && !current.ends_with('/') {
            current.push('/');
        }
        current.push_str(segment);
        directories.push(current.clone());
    }
    directories
}
