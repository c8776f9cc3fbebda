use super::*;
use std::fs;
use std::path::{Path, PathBuf};

fn relative(root: &Path, files: &[PathBuf]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|path| path.strip_prefix(root).expect("under root").to_path_buf())
        .collect()
}

#[test]
fn missing_root_is_reported() {
    let error = list_files("/nonexistent/path/for/enumerator").expect_err("missing root");
    assert!(matches!(error.kind(), WalkErrorKind::RootMetadata));
    assert_eq!(error.path(), Path::new("/nonexistent/path/for/enumerator"));
}

#[test]
fn file_root_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("file.txt");
    fs::write(&file, b"contents").expect("write");

    let error = list_files(&file).expect_err("file root");
    assert!(matches!(error.kind(), WalkErrorKind::NotADirectory));
}

#[test]
fn directories_are_descended_but_not_listed() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    fs::create_dir_all(root.join("a/deeper")).expect("dirs");
    fs::create_dir(root.join("empty")).expect("empty dir");
    fs::write(root.join("a/inner.txt"), b"data").expect("inner");
    fs::write(root.join("a/deeper/leaf.bin"), b"data").expect("leaf");
    fs::write(root.join("c.txt"), b"data").expect("c");

    let files = list_files(&root).expect("enumerate");
    assert_eq!(
        relative(&root, &files),
        vec![
            PathBuf::from("a/deeper/leaf.bin"),
            PathBuf::from("a/inner.txt"),
            PathBuf::from("c.txt"),
        ]
    );
}

#[test]
fn hidden_files_are_listed() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    fs::create_dir(root.join(".config")).expect("hidden dir");
    fs::write(root.join(".config/settings"), b"x").expect("settings");
    fs::write(root.join(".hidden"), b"x").expect("hidden");

    let files = list_files(root).expect("enumerate");
    assert_eq!(
        relative(root, &files),
        vec![PathBuf::from(".config/settings"), PathBuf::from(".hidden")]
    );
}

#[test]
fn paths_keep_the_supplied_root_prefix() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("src");
    fs::create_dir(&root).expect("root");
    fs::write(root.join("main.rs"), b"fn main() {}").expect("write");

    let files = FileEnumerator::new(&root).files().expect("enumerate");
    assert_eq!(files, vec![root.join("main.rs")]);
    assert!(files[0].starts_with(&root));
}

#[test]
fn enumeration_is_repeatable() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    for name in ["zeta", "alpha", "mid", "Beta"] {
        fs::write(root.join(name), b"x").expect("write");
    }

    let first = list_files(root).expect("first");
    let second = list_files(root).expect("second");
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[cfg(unix)]
#[test]
fn symlinked_directories_are_followed() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    let target = temp.path().join("target");
    fs::create_dir(&root).expect("root");
    fs::create_dir(&target).expect("target");
    fs::write(target.join("inner.txt"), b"data").expect("inner");
    symlink(&target, root.join("link")).expect("symlink");

    let files = list_files(&root).expect("enumerate");
    assert_eq!(relative(&root, &files), vec![PathBuf::from("link/inner.txt")]);
}

#[cfg(unix)]
#[test]
fn dangling_symlinks_are_skipped() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    symlink(root.join("missing"), root.join("broken")).expect("symlink");
    fs::write(root.join("real.txt"), b"x").expect("write");

    let files = list_files(root).expect("enumerate");
    assert_eq!(relative(root, &files), vec![PathBuf::from("real.txt")]);
}

#[cfg(unix)]
#[test]
fn symlink_cycles_terminate() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    fs::create_dir(&root).expect("root");
    fs::write(root.join("file.txt"), b"x").expect("write");
    symlink(&root, root.join("self")).expect("symlink");

    let files = list_files(&root).expect("enumerate");
    assert_eq!(relative(&root, &files), vec![PathBuf::from("file.txt")]);
}
