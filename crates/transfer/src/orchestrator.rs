use std::path::{Path, PathBuf};

use remote::{CommandOptions, ConnectionManager, RemoteTransport};
use tracing::{debug, error, info};

use crate::{
    CopyError, CopyOptions, FileReport, FileTransferError, TargetFolder, TargetMapping,
    TransferOutcome, TransferSummary,
};

/// Shell command that empties `target` on the remote host.
///
/// ```
/// use transfer::{TargetFolder, clean_command};
///
/// assert_eq!(clean_command(&TargetFolder::new("/srv/www")), r#"rm -rf "/srv/www"/*"#);
/// ```
pub fn clean_command(target: &TargetFolder) -> String {
    format!("rm -rf \"{}\"/*", target.as_str())
}

/// Removes the contents of `target` before anything is copied.
///
/// Standard error output fails the command, as does a non-zero exit status.
pub async fn clean_target_folder<T: RemoteTransport>(
    manager: &mut ConnectionManager<T>,
    target: &TargetFolder,
) -> Result<(), CopyError> {
    info!(target: "sshcopy::copy", "cleaning target folder {}", target.as_str());
    manager
        .execute_remote_command(&clean_command(target), CommandOptions::default())
        .await
        .map_err(CopyError::CleanTarget)?;
    Ok(())
}

/// Copies `files` one at a time, in order.
///
/// A file that cannot be copied is logged and recorded; the loop always
/// continues with the next file. The returned summary holds one report per
/// file.
pub async fn transfer_files<T: RemoteTransport>(
    manager: &mut ConnectionManager<T>,
    files: &[PathBuf],
    source_root: &Path,
    target: &TargetFolder,
    options: CopyOptions,
) -> TransferSummary {
    let mut summary = TransferSummary::default();
    info!(target: "sshcopy::copy", "copying {} files to the remote machine", files.len());

    for file in files {
        let mapping = TargetMapping::new(file, source_root, target, options.flatten_folders);
        debug!(target: "sshcopy::copy", "relative path = {}", mapping.relative_path());
        info!(
            target: "sshcopy::copy",
            "copying {} to {}",
            file.display(),
            mapping.target_path()
        );

        let outcome = match copy_file(manager, &mapping, options.overwrite).await {
            Ok(()) => TransferOutcome::Uploaded,
            Err(reason) => {
                error!(target: "sshcopy::copy", "failed to copy {}: {reason}", file.display());
                TransferOutcome::Failed { reason }
            }
        };
        summary.push(FileReport::new(mapping, outcome));
    }

    info!(target: "sshcopy::copy", "completed copying {} files", files.len());
    summary
}

async fn copy_file<T: RemoteTransport>(
    manager: &mut ConnectionManager<T>,
    mapping: &TargetMapping,
    overwrite: bool,
) -> Result<(), FileTransferError> {
    if !overwrite && manager.path_exists(mapping.target_path()).await? {
        return Err(FileTransferError::AlreadyExists {
            target: mapping.target_path().to_owned(),
        });
    }
    manager
        .upload_file(mapping.source_path(), mapping.target_path())
        .await?;
    Ok(())
}
