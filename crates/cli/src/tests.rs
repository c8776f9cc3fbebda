use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use remote::Credentials;
use transfer::ConfigurationError;

use super::arguments::{parse_args, split_contents};
use super::settings::{copy_config, ssh_config};
use super::*;

fn run_with_args<I, S>(args: I) -> (i32, Vec<u8>, Vec<u8>)
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run(args, &mut stdout, &mut stderr);
    (code, stdout, stderr)
}

const REQUIRED: [&str; 7] = [
    "sshcopy",
    "--source-folder",
    "dist",
    "--host",
    "example.com",
    "--user",
    "deploy",
];

fn parse_with(extra: &[&str]) -> ParsedArgs {
    parse_args(REQUIRED.iter().chain(extra)).expect("arguments parse")
}

#[test]
fn version_flag_prints_the_package_version() {
    let (code, stdout, stderr) = run_with_args(["sshcopy", "--version"]);

    assert_eq!(code, 0);
    assert!(stderr.is_empty());
    let stdout = String::from_utf8(stdout).expect("utf8");
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_flag_lists_the_options() {
    let (code, stdout, stderr) = run_with_args(["sshcopy", "--help"]);

    assert_eq!(code, 0);
    assert!(stderr.is_empty());
    let stdout = String::from_utf8(stdout).expect("utf8");
    for option in ["--source-folder", "--contents", "--ready-timeout", "--no-overwrite"] {
        assert!(stdout.contains(option), "help is missing {option}");
    }
}

#[test]
fn unknown_option_is_a_usage_error() {
    let (code, stdout, stderr) = run_with_args(["sshcopy", "--delete"]);

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(!stderr.is_empty());
}

#[test]
fn missing_required_option_is_a_usage_error() {
    let (code, _, stderr) = run_with_args(["sshcopy", "--source-folder", "dist"]);

    assert_eq!(code, 1);
    assert!(String::from_utf8_lossy(&stderr).contains("--host"));
}

#[test]
fn zero_ready_timeout_is_rejected_by_the_parser() {
    assert!(parse_args(REQUIRED.iter().chain(&["--ready-timeout", "0"])).is_err());
}

#[test]
fn missing_ready_timeout_is_a_configuration_error() {
    let (code, _, stderr) = run_with_args(REQUIRED);

    assert_eq!(code, 1);
    assert!(String::from_utf8_lossy(&stderr).contains("ready timeout"));
}

#[test]
fn missing_source_folder_fails_before_connecting() {
    let dir = tempfile::tempdir().expect("tempdir");
    let key = dir.path().join("id_test");
    std::fs::write(&key, "not a real key").expect("write key");
    let source = dir.path().join("missing");

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run(
        [
            OsString::from("sshcopy"),
            OsString::from("--source-folder"),
            source.into_os_string(),
            OsString::from("--host"),
            OsString::from("192.0.2.1"),
            OsString::from("--user"),
            OsString::from("deploy"),
            OsString::from("--ready-timeout"),
            OsString::from("5"),
            OsString::from("--identity-file"),
            key.into_os_string(),
        ],
        &mut stdout,
        &mut stderr,
    );

    assert_eq!(code, 1);
    assert!(String::from_utf8_lossy(&stderr).contains("source folder"));
}

#[test]
fn defaults_copy_everything_with_overwrite() {
    let parsed = parse_with(&[]);
    assert_eq!(parsed.source_folder, PathBuf::from("dist"));
    assert!(parsed.contents.is_empty());
    assert!(parsed.overwrite);
    assert_eq!(parsed.verbosity(), logging::Verbosity::Normal);

    let config = copy_config(&parsed);
    assert_eq!(config.contents(), &["**".to_owned()]);
    assert_eq!(config.target_folder().as_str(), "./");
    assert!(config.options().overwrite);
}

#[test]
fn contents_values_are_split_into_lines() {
    let parsed = parse_with(&["--contents", "  *.js\n\n!vendor/** \n", "--contents", "*.css"]);
    assert_eq!(parsed.contents, ["*.js", "!vendor/**", "*.css"]);
    assert_eq!(copy_config(&parsed).contents(), parsed.contents.as_slice());
}

#[test]
fn blank_contents_fall_back_to_everything() {
    assert!(split_contents(["", "  \n\t"]).is_empty());
    let parsed = parse_with(&["--contents", "\n"]);
    assert_eq!(copy_config(&parsed).contents(), &["**".to_owned()]);
}

#[test]
fn last_overwrite_flag_wins() {
    assert!(!parse_with(&["--no-overwrite"]).overwrite);
    assert!(parse_with(&["--no-overwrite", "--overwrite"]).overwrite);
    assert!(!parse_with(&["--overwrite", "--no-overwrite"]).overwrite);
}

#[test]
fn boolean_flags_reach_the_copy_options() {
    let parsed = parse_with(&[
        "--clean-target-folder",
        "--fail-on-empty-source",
        "--flatten-folders",
        "--target-folder",
        "~/public",
    ]);
    let config = copy_config(&parsed);
    let options = config.options();
    assert!(options.clean_target_folder);
    assert!(options.fail_on_empty_source);
    assert!(options.flatten_folders);
    assert_eq!(config.target_folder().as_str(), "./public");
}

#[test]
fn verbosity_follows_the_flag_count() {
    assert_eq!(parse_with(&["-vv"]).verbosity(), logging::Verbosity::Debug);
    assert_eq!(parse_with(&["-q"]).verbosity(), logging::Verbosity::Quiet);
    assert!(parse_args(REQUIRED.iter().chain(&["-q", "-v"])).is_err());
}

#[test]
fn log_flags_override_single_targets() {
    use logging::LogTarget;
    use tracing::level_filters::LevelFilter;

    let parsed = parse_with(&["-q", "--log", "copy=debug", "--log", "sshcopy::cmd=info"]);
    assert_eq!(parsed.log_config.level(LogTarget::Copy), LevelFilter::DEBUG);
    assert_eq!(parsed.log_config.level(LogTarget::Cmd), LevelFilter::INFO);
    assert_eq!(parsed.log_config.level(LogTarget::Stats), LevelFilter::ERROR);

    let later = parse_with(&["--log", "filter=trace", "--log", "filter=off"]);
    assert_eq!(later.log_config.level(LogTarget::Filter), LevelFilter::OFF);
}

#[test]
fn malformed_log_flag_is_a_usage_error() {
    for token in ["copy", "bogus=info", "copy=loud"] {
        let (code, stdout, stderr) = run_with_args(REQUIRED.iter().chain(&["--log", token]));

        assert_eq!(code, 1, "{token}");
        assert!(stdout.is_empty());
        assert!(!stderr.is_empty());
    }

    let (_, _, stderr) = run_with_args(REQUIRED.iter().chain(&["--log", "bogus=info"]));
    assert!(String::from_utf8_lossy(&stderr).contains("unknown log target"));
}

#[test]
fn ssh_config_defaults_the_port() {
    let parsed = parse_with(&["--ready-timeout", "20"]);
    let ssh = ssh_config(&parsed, Some("secret".to_owned())).expect("config");

    assert_eq!(ssh.host(), "example.com");
    assert_eq!(ssh.username(), "deploy");
    assert_eq!(ssh.port(), 22);
    assert_eq!(ssh.ready_timeout(), Duration::from_secs(20));
    assert!(matches!(ssh.credentials(), Credentials::Password(password) if password.as_str() == "secret"));
}

#[test]
fn ssh_config_keeps_an_explicit_port() {
    let parsed = parse_with(&["--ready-timeout", "20", "--port", "2222"]);
    let ssh = ssh_config(&parsed, Some("secret".to_owned())).expect("config");
    assert_eq!(ssh.port(), 2222);
}

#[test]
fn identity_file_turns_the_password_into_a_passphrase() {
    let dir = tempfile::tempdir().expect("tempdir");
    let key = dir.path().join("id_test");
    std::fs::write(&key, "KEY MATERIAL").expect("write key");
    let key_arg = key.to_string_lossy().into_owned();

    let parsed = parse_with(&["--ready-timeout", "5", "--identity-file", &key_arg]);
    let ssh = ssh_config(&parsed, Some("phrase".to_owned())).expect("config");

    match ssh.credentials() {
        Credentials::PrivateKey { key, passphrase } => {
            assert_eq!(key.as_str(), "KEY MATERIAL");
            assert_eq!(passphrase.as_ref().map(|p| p.as_str()), Some("phrase"));
        }
        Credentials::Password(_) => panic!("expected key authentication"),
    }

    let ssh = ssh_config(&parsed, None).expect("config");
    assert!(matches!(
        ssh.credentials(),
        Credentials::PrivateKey {
            passphrase: None,
            ..
        }
    ));
}

#[test]
fn unreadable_identity_file_is_reported() {
    let parsed = parse_with(&[
        "--ready-timeout",
        "5",
        "--identity-file",
        "/nonexistent/sshcopy/id_test",
    ]);
    assert!(matches!(
        ssh_config(&parsed, None),
        Err(ConfigurationError::IdentityFile { .. })
    ));
}

#[test]
fn credentials_are_required() {
    let parsed = parse_with(&["--ready-timeout", "5"]);
    assert!(matches!(
        ssh_config(&parsed, None),
        Err(ConfigurationError::MissingCredentials)
    ));
    assert!(matches!(
        ssh_config(&parsed, Some(String::new())),
        Err(ConfigurationError::MissingCredentials)
    ));
}

#[test]
fn ready_timeout_is_checked_first() {
    let parsed = parse_with(&[]);
    assert!(matches!(
        ssh_config(&parsed, None),
        Err(ConfigurationError::MissingReadyTimeout)
    ));
}
