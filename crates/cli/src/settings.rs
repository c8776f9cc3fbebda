//! Turns parsed arguments into copy and session settings.

use std::fs;
use std::time::Duration;

use remote::{Credentials, DEFAULT_PORT, SshConfig};
use tracing::info;
use transfer::{ConfigurationError, CopyConfig, CopyOptions, TargetFolder};

use crate::arguments::ParsedArgs;

pub(crate) fn copy_config(parsed: &ParsedArgs) -> CopyConfig {
    let mut config = CopyConfig::new(&parsed.source_folder).with_options(CopyOptions {
        clean_target_folder: parsed.clean_target_folder,
        overwrite: parsed.overwrite,
        fail_on_empty_source: parsed.fail_on_empty_source,
        flatten_folders: parsed.flatten_folders,
    });
    if !parsed.contents.is_empty() {
        config = config.with_contents(parsed.contents.iter().cloned());
    }
    if let Some(target) = &parsed.target_folder {
        config = config.with_target_folder(TargetFolder::new(target));
    }
    config
}

/// Builds the session settings.
///
/// With an identity file the password becomes the key passphrase; without
/// one it is used for password authentication.
pub(crate) fn ssh_config(
    parsed: &ParsedArgs,
    password: Option<String>,
) -> Result<SshConfig, ConfigurationError> {
    let ready_timeout = parsed
        .ready_timeout
        .map(Duration::from_secs)
        .ok_or(ConfigurationError::MissingReadyTimeout)?;

    let password = password.filter(|password| !password.is_empty());
    let credentials = match (&parsed.identity_file, password) {
        (Some(path), passphrase) => {
            let key = fs::read_to_string(path).map_err(|source| {
                ConfigurationError::IdentityFile {
                    path: path.clone(),
                    source,
                }
            })?;
            Credentials::private_key(key, passphrase)
        }
        (None, Some(password)) => Credentials::password(password),
        (None, None) => return Err(ConfigurationError::MissingCredentials),
    };

    let port = parsed.port.unwrap_or_else(|| {
        info!(target: "sshcopy::connect", "port not set, using {DEFAULT_PORT}");
        DEFAULT_PORT
    });

    Ok(SshConfig::new(&parsed.host, &parsed.user, credentials, ready_timeout).with_port(port))
}
