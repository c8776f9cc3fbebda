//! Whole-run behaviour of `run_copy`: ordering of remote operations, fatal
//! errors, and session teardown on every path.

use filters::MatchOptions;
use remote::{Credentials, ExecEvent, RemoteHandle, SshConfig};
use std::time::Duration;
use test_support::{Call, MockTransport, SourceTree};
use transfer::{
    ConfigurationError, CopyConfig, CopyError, CopyOptions, ExitCode, TargetFolder, run_copy,
};

const ALL_HANDLES: [RemoteHandle; 3] = [
    RemoteHandle::Stat,
    RemoteHandle::Transfer,
    RemoteHandle::Command,
];

fn ssh() -> SshConfig {
    SshConfig::new(
        "deploy.example.org",
        "ci",
        Credentials::password("secret"),
        Duration::from_secs(5),
    )
}

fn config(tree: &SourceTree) -> CopyConfig {
    CopyConfig::new(tree.path()).with_match_options(MatchOptions::case_sensitive())
}

// =============================================================================
// Successful runs
// =============================================================================

#[tokio::test]
async fn copies_every_file_and_closes_the_session() {
    let tree = SourceTree::with_files(&["a.txt", "b/c.txt"]).expect("tree");
    let transport = MockTransport::new();

    let summary = run_copy(&config(&tree), &ssh(), transport.clone())
        .await
        .expect("run succeeds");

    assert_eq!(summary.total(), 2);
    assert_eq!(summary.uploaded(), 2);
    assert_eq!(transport.upload_targets(), vec!["a.txt", "b/c.txt"]);
    assert_eq!(transport.closed_handles(), ALL_HANDLES);
}

#[tokio::test]
async fn negated_directory_pattern_keeps_dotfiles() {
    let tree = SourceTree::with_files(&["a.txt", "b/c.txt", ".hidden"]).expect("tree");
    let transport = MockTransport::new();
    let config = config(&tree).with_contents(["**", "!b/**"]);

    run_copy(&config, &ssh(), transport.clone())
        .await
        .expect("run succeeds");

    assert_eq!(transport.upload_targets(), vec![".hidden", "a.txt"]);
}

#[tokio::test]
async fn clean_runs_before_any_upload() {
    let tree = SourceTree::with_files(&["a.txt"]).expect("tree");
    let transport = MockTransport::new();
    let config = config(&tree)
        .with_target_folder(TargetFolder::new("/srv/www"))
        .with_options(CopyOptions {
            clean_target_folder: true,
            ..CopyOptions::default()
        });

    run_copy(&config, &ssh(), transport.clone())
        .await
        .expect("run succeeds");

    let calls = transport.calls();
    assert_eq!(calls[0], Call::ConnectCommand);
    assert_eq!(calls[1], Call::ConnectTransfer);
    assert_eq!(calls[2], Call::Execute(r#"rm -rf "/srv/www"/*"#.to_owned()));
    assert!(matches!(&calls[3], Call::Upload { target, .. } if target == "/srv/www/a.txt"));
}

#[tokio::test]
async fn empty_selection_warns_and_succeeds() {
    let tree = SourceTree::with_files(&["a.txt"]).expect("tree");
    let transport = MockTransport::new();
    let config = config(&tree).with_contents(["*.png"]);

    let summary = run_copy(&config, &ssh(), transport.clone())
        .await
        .expect("empty selection is not fatal");

    assert_eq!(summary.total(), 0);
    assert!(transport.upload_targets().is_empty());
    assert_eq!(transport.closed_handles(), ALL_HANDLES);
}

// =============================================================================
// Fatal errors
// =============================================================================

#[tokio::test]
async fn empty_selection_is_fatal_when_requested() {
    let tree = SourceTree::with_files(&["a.txt"]).expect("tree");
    let transport = MockTransport::new();
    let config = config(&tree)
        .with_contents(["*.png"])
        .with_options(CopyOptions {
            fail_on_empty_source: true,
            ..CopyOptions::default()
        });

    let error = run_copy(&config, &ssh(), transport.clone())
        .await
        .expect_err("empty selection is fatal");

    assert!(matches!(error, CopyError::EmptySource));
    assert_eq!(error.exit_code(), ExitCode::FileSelect);
    assert_eq!(transport.closed_handles(), ALL_HANDLES);
}

#[tokio::test]
async fn source_folder_is_checked_before_connecting() {
    let tree = SourceTree::with_files(&["file.txt"]).expect("tree");
    let transport = MockTransport::new();
    let config = CopyConfig::new(tree.file("file.txt"));

    let error = run_copy(&config, &ssh(), transport.clone())
        .await
        .expect_err("not a directory");

    assert!(matches!(
        error,
        CopyError::Configuration(ConfigurationError::SourceNotFolder { .. })
    ));
    assert_eq!(error.exit_code(), ExitCode::Syntax);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn connection_failure_still_tears_down() {
    let tree = SourceTree::with_files(&["a.txt"]).expect("tree");
    let transport = MockTransport::new().failing_connect(RemoteHandle::Transfer);

    let error = run_copy(&config(&tree), &ssh(), transport.clone())
        .await
        .expect_err("connect fails");

    assert!(matches!(error, CopyError::Connection(_)));
    assert_eq!(error.exit_code(), ExitCode::StartClient);
    assert!(transport.upload_targets().is_empty());
    assert_eq!(transport.closed_handles(), ALL_HANDLES);
}

#[tokio::test]
async fn clean_failure_aborts_before_any_file() {
    let tree = SourceTree::with_files(&["a.txt"]).expect("tree");
    let transport = MockTransport::new().script_exec(vec![
        ExecEvent::Stderr(b"rm: cannot remove: Permission denied\n".to_vec()),
        ExecEvent::Closed {
            exit_code: Some(1),
            signal: None,
        },
    ]);
    let config = config(&tree).with_options(CopyOptions {
        clean_target_folder: true,
        ..CopyOptions::default()
    });

    let error = run_copy(&config, &ssh(), transport.clone())
        .await
        .expect_err("clean fails");

    assert!(matches!(error, CopyError::CleanTarget(_)));
    assert_eq!(error.exit_code(), ExitCode::CommandFailed);
    assert!(transport.upload_targets().is_empty());
    assert_eq!(transport.closed_handles(), ALL_HANDLES);
}

#[tokio::test]
async fn invalid_pattern_is_fatal_and_closes() {
    let tree = SourceTree::with_files(&["a.txt"]).expect("tree");
    let transport = MockTransport::new();
    let config = config(&tree).with_contents(["[unterminated"]);

    let error = run_copy(&config, &ssh(), transport.clone())
        .await
        .expect_err("bad glob");

    assert!(matches!(error, CopyError::Filter(_)));
    assert_eq!(transport.closed_handles(), ALL_HANDLES);
}

// =============================================================================
// Partial failure
// =============================================================================

#[tokio::test]
async fn failed_files_are_counted_after_all_were_attempted() {
    let tree = SourceTree::with_files(&["a.txt", "b.txt", "c.txt"]).expect("tree");
    let transport = MockTransport::new()
        .failing_upload("b.txt")
        .failing_close(RemoteHandle::Stat);

    let error = run_copy(&config(&tree), &ssh(), transport.clone())
        .await
        .expect_err("one file fails");

    assert!(matches!(
        error,
        CopyError::PartialTransfer {
            failed: 1,
            total: 3
        }
    ));
    assert_eq!(error.exit_code(), ExitCode::PartialTransfer);
    assert_eq!(transport.upload_targets(), vec!["a.txt", "b.txt", "c.txt"]);
    assert_eq!(transport.closed_handles(), ALL_HANDLES);
}
