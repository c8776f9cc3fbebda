use std::path::{Path, PathBuf};

use filters::{PatternSet, select_files};
use remote::{ConnectionManager, RemoteTransport, SshConfig};
use tracing::{debug, info, warn};

use crate::{CopyConfig, CopyError, TransferSummary, clean_target_folder, transfer_files};

/// Runs a complete copy.
///
/// The source folder is checked before any connection is attempted. Once a
/// session exists it is closed on every path, after the last file or after
/// the first fatal error. Per-file failures turn into
/// [`CopyError::PartialTransfer`] after every file was attempted.
pub async fn run_copy<T: RemoteTransport>(
    config: &CopyConfig,
    ssh: &SshConfig,
    transport: T,
) -> Result<TransferSummary, CopyError> {
    let source_root = config.resolve_source_folder()?;

    let mut manager = ConnectionManager::new(transport);
    let result = copy_with_session(&mut manager, config, ssh, &source_root).await;
    debug!(target: "sshcopy::connect", "closing the client connection");
    manager.close().await;

    let summary = result?;
    info!(
        target: "sshcopy::stats",
        "copied {} of {} files",
        summary.uploaded(),
        summary.total()
    );
    if !summary.is_success() {
        return Err(CopyError::PartialTransfer {
            failed: summary.failed(),
            total: summary.total(),
        });
    }
    Ok(summary)
}

async fn copy_with_session<T: RemoteTransport>(
    manager: &mut ConnectionManager<T>,
    config: &CopyConfig,
    ssh: &SshConfig,
    source_root: &Path,
) -> Result<TransferSummary, CopyError> {
    manager.open(ssh).await?;

    let options = config.options();
    if options.clean_target_folder {
        clean_target_folder(manager, config.target_folder()).await?;
    }

    let files = select_source_files(config, source_root)?;
    if files.is_empty() {
        if options.fail_on_empty_source {
            return Err(CopyError::EmptySource);
        }
        warn!(target: "sshcopy::copy", "no files matched the content patterns; nothing to copy");
        return Ok(TransferSummary::default());
    }

    Ok(transfer_files(manager, &files, source_root, config.target_folder(), options).await)
}

/// Lists the files below `source_root` selected by the configured patterns,
/// in transfer order.
pub fn select_source_files(
    config: &CopyConfig,
    source_root: &Path,
) -> Result<Vec<PathBuf>, CopyError> {
    let patterns = PatternSet::resolve(config.contents(), source_root);
    let candidates = walk::list_files(source_root)?;
    let selected = select_files(&candidates, &patterns, config.match_options())?;
    debug!(target: "sshcopy::copy", "number of files to copy = {}", selected.len());
    Ok(selected)
}
