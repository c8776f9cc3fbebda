use std::fmt;
use std::time::Duration;
use zeroize::Zeroizing;

/// Port used when the endpoint does not name one.
pub const DEFAULT_PORT: u16 = 22;

/// How the client proves its identity to the remote host.
///
/// Secrets live in [`Zeroizing`] buffers and are wiped when dropped. The
/// `Debug` output never includes them.
#[derive(Clone)]
pub enum Credentials {
    /// An OpenSSH or PEM encoded private key, optionally encrypted.
    PrivateKey {
        /// Key material as read from the identity file.
        key: Zeroizing<String>,
        /// Passphrase protecting `key`.
        passphrase: Option<Zeroizing<String>>,
    },
    /// Password authentication.
    Password(Zeroizing<String>),
}

impl Credentials {
    /// Key authentication with an optional passphrase.
    pub fn private_key(key: impl Into<String>, passphrase: Option<String>) -> Self {
        Self::PrivateKey {
            key: Zeroizing::new(key.into()),
            passphrase: passphrase.map(Zeroizing::new),
        }
    }

    /// Password authentication.
    pub fn password(password: impl Into<String>) -> Self {
        Self::Password(Zeroizing::new(password.into()))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrivateKey { passphrase, .. } => f
                .debug_struct("PrivateKey")
                .field("key", &"<redacted>")
                .field("passphrase", &passphrase.as_ref().map(|_| "<redacted>"))
                .finish(),
            Self::Password(_) => f.debug_tuple("Password").field(&"<redacted>").finish(),
        }
    }
}

/// Endpoint and authentication settings for one session.
#[derive(Clone, Debug)]
pub struct SshConfig {
    host: String,
    port: u16,
    username: String,
    credentials: Credentials,
    ready_timeout: Duration,
}

impl SshConfig {
    /// Creates a configuration for `username@host` on [`DEFAULT_PORT`].
    ///
    /// `ready_timeout` bounds how long each connection may take to become
    /// ready, handshake and authentication included.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        credentials: Credentials,
        ready_timeout: Duration,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            credentials,
            ready_timeout,
        }
    }

    /// Overrides the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Remote host name or address.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Remote port.
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Login name on the remote host.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Authentication material.
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Connection establishment timeout.
    pub const fn ready_timeout(&self) -> Duration {
        self.ready_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_to_ssh() {
        let config = SshConfig::new(
            "example.org",
            "deploy",
            Credentials::password("secret"),
            Duration::from_secs(20),
        );
        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.with_port(2222).port(), 2222);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let password = format!("{:?}", Credentials::password("hunter2"));
        assert!(!password.contains("hunter2"));

        let key = format!(
            "{:?}",
            Credentials::private_key("-----BEGIN KEY-----", Some("open sesame".to_owned()))
        );
        assert!(!key.contains("BEGIN KEY"));
        assert!(!key.contains("open sesame"));
        assert!(key.contains("redacted"));
    }
}
