use crate::error::WalkError;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Configures the enumeration of regular files below a source folder.
///
/// Symlinks are always followed: a link to a file is reported as a file and a
/// link to a directory is descended into. Dangling links and special
/// files (sockets, FIFOs, devices) are skipped.
#[derive(Clone, Debug)]
pub struct FileEnumerator {
    root: PathBuf,
}

impl FileEnumerator {
    /// Creates an enumerator rooted at `root`.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Returns the configured root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walks the tree and returns every file below the root.
    ///
    /// Directory entries are sorted by name before they are visited and the
    /// contents of a directory are emitted before its next sibling, so the
    /// result is stable for an unchanged tree.
    pub fn files(&self) -> Result<Vec<PathBuf>, WalkError> {
        let metadata = fs::metadata(&self.root)
            .map_err(|error| WalkError::root_metadata(self.root.clone(), error))?;
        if !metadata.is_dir() {
            return Err(WalkError::not_a_directory(self.root.clone()));
        }

        let mut files = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = Vec::new();
        enter_directory(self.root.clone(), &mut visited, &mut stack)?;

        loop {
            let path = match stack.last_mut() {
                Some(state) => match state.next_name() {
                    Some(name) => state.path.join(name),
                    None => {
                        stack.pop();
                        continue;
                    }
                },
                None => break,
            };

            match classify(&path)? {
                EntryKind::Directory => enter_directory(path, &mut visited, &mut stack)?,
                EntryKind::File => files.push(path),
                EntryKind::Skipped => {}
            }
        }

        debug!(
            target: "sshcopy::flist",
            "counted {} files below {}",
            files.len(),
            self.root.display()
        );
        Ok(files)
    }
}

fn classify(path: &Path) -> Result<EntryKind, WalkError> {
    let metadata =
        fs::symlink_metadata(path).map_err(|error| WalkError::metadata(path.to_path_buf(), error))?;
    let file_type = metadata.file_type();

    if file_type.is_dir() {
        return Ok(EntryKind::Directory);
    }
    if file_type.is_file() {
        return Ok(EntryKind::File);
    }
    if !file_type.is_symlink() {
        trace!(target: "sshcopy::flist", "skipping special file {}", path.display());
        return Ok(EntryKind::Skipped);
    }

    match fs::metadata(path) {
        Ok(target) if target.is_dir() => Ok(EntryKind::Directory),
        Ok(target) if target.is_file() => Ok(EntryKind::File),
        Ok(_) => Ok(EntryKind::Skipped),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!(target: "sshcopy::flist", "skipping dangling symlink {}", path.display());
            Ok(EntryKind::Skipped)
        }
        Err(error) => Err(WalkError::metadata(path.to_path_buf(), error)),
    }
}

/// Lists every file below `root` with symlinks followed.
pub fn list_files<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>, WalkError> {
    FileEnumerator::new(root.as_ref()).files()
}

enum EntryKind {
    Directory,
    File,
    Skipped,
}

fn enter_directory(
    path: PathBuf,
    visited: &mut HashSet<PathBuf>,
    stack: &mut Vec<DirectoryState>,
) -> Result<(), WalkError> {
    let canonical =
        fs::canonicalize(&path).map_err(|error| WalkError::canonicalize(path.clone(), error))?;
    if !visited.insert(canonical) {
        debug!(target: "sshcopy::flist", "skipping already visited directory {}", path.display());
        return Ok(());
    }

    stack.push(DirectoryState::read(path)?);
    Ok(())
}

struct DirectoryState {
    path: PathBuf,
    names: Vec<OsString>,
    index: usize,
}

impl DirectoryState {
    fn read(path: PathBuf) -> Result<Self, WalkError> {
        let read_dir =
            fs::read_dir(&path).map_err(|error| WalkError::read_dir(path.clone(), error))?;
        let mut names = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|error| WalkError::read_dir_entry(path.clone(), error))?;
            names.push(entry.file_name());
        }
        names.sort();

        Ok(Self {
            path,
            names,
            index: 0,
        })
    }

    fn next_name(&mut self) -> Option<OsString> {
        let name = self.names.get(self.index).cloned();
        if name.is_some() {
            self.index += 1;
        }
        name
    }
}
