use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Stage of the enumeration that failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WalkErrorKind {
    /// The root could not be inspected, usually because it does not exist.
    RootMetadata,
    /// The root exists but is not a directory.
    NotADirectory,
    /// A directory could not be opened.
    ReadDir,
    /// Listing a directory failed part-way.
    ReadDirEntry,
    /// An entry could not be inspected.
    Metadata,
    /// A directory could not be canonicalized for cycle detection.
    Canonicalize,
}

/// Error returned when the source tree cannot be enumerated.
///
/// Carries the path being processed and, except for
/// [`WalkErrorKind::NotADirectory`], the I/O error behind the failure.
#[derive(Debug)]
pub struct WalkError {
    kind: WalkErrorKind,
    path: PathBuf,
    source: Option<io::Error>,
}

impl WalkError {
    const fn io(kind: WalkErrorKind, path: PathBuf, source: io::Error) -> Self {
        Self {
            kind,
            path,
            source: Some(source),
        }
    }

    pub(crate) const fn root_metadata(path: PathBuf, source: io::Error) -> Self {
        Self::io(WalkErrorKind::RootMetadata, path, source)
    }

    pub(crate) const fn not_a_directory(path: PathBuf) -> Self {
        Self {
            kind: WalkErrorKind::NotADirectory,
            path,
            source: None,
        }
    }

    pub(crate) const fn read_dir(path: PathBuf, source: io::Error) -> Self {
        Self::io(WalkErrorKind::ReadDir, path, source)
    }

    pub(crate) const fn read_dir_entry(path: PathBuf, source: io::Error) -> Self {
        Self::io(WalkErrorKind::ReadDirEntry, path, source)
    }

    pub(crate) const fn metadata(path: PathBuf, source: io::Error) -> Self {
        Self::io(WalkErrorKind::Metadata, path, source)
    }

    pub(crate) const fn canonicalize(path: PathBuf, source: io::Error) -> Self {
        Self::io(WalkErrorKind::Canonicalize, path, source)
    }

    /// Which stage failed.
    #[must_use]
    pub const fn kind(&self) -> WalkErrorKind {
        self.kind
    }

    /// Path being processed when the failure happened.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match self.kind {
            WalkErrorKind::RootMetadata => write!(f, "source folder '{path}' is not accessible")?,
            WalkErrorKind::NotADirectory => write!(f, "source folder '{path}' is not a directory")?,
            WalkErrorKind::ReadDir => write!(f, "failed to read directory '{path}'")?,
            WalkErrorKind::ReadDirEntry => write!(f, "failed to read entry in '{path}'")?,
            WalkErrorKind::Metadata => write!(f, "failed to inspect '{path}'")?,
            WalkErrorKind::Canonicalize => write!(f, "failed to resolve '{path}'")?,
        }
        match &self.source {
            Some(source) => write!(f, ": {source}"),
            None => Ok(()),
        }
    }
}

impl Error for WalkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|source| source as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_keeps_its_path() {
        let root = WalkError::root_metadata(PathBuf::from("root"), io::Error::other("gone"));
        assert_eq!(root.path(), Path::new("root"));
        assert_eq!(root.kind(), WalkErrorKind::RootMetadata);

        let canonicalize =
            WalkError::canonicalize(PathBuf::from("loop"), io::Error::other("too many links"));
        assert_eq!(canonicalize.path(), Path::new("loop"));
        assert_eq!(canonicalize.kind(), WalkErrorKind::Canonicalize);
    }

    #[test]
    fn display_appends_the_io_error() {
        let not_dir = WalkError::not_a_directory(PathBuf::from("notes.txt"));
        assert_eq!(
            not_dir.to_string(),
            "source folder 'notes.txt' is not a directory"
        );

        let read_dir = WalkError::read_dir(PathBuf::from("dir"), io::Error::other("boom"));
        assert_eq!(read_dir.to_string(), "failed to read directory 'dir': boom");
    }

    #[test]
    fn source_is_absent_only_for_non_directories() {
        let error = WalkError::metadata(PathBuf::from("entry"), io::Error::other("denied"));
        let source = error
            .source()
            .and_then(|err| err.downcast_ref::<io::Error>())
            .map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("denied"));

        assert!(WalkError::not_a_directory(PathBuf::from("x")).source().is_none());
    }
}
