use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filters::{CATCH_ALL_PATTERN, MatchOptions};

use crate::ConfigurationError;

/// Remote destination root.
///
/// Empty input means `./`. A leading `~/` is rewritten to `./`, since the
/// remote home is already the working directory of every session.
///
/// ```
/// use transfer::TargetFolder;
///
/// assert_eq!(TargetFolder::new("").as_str(), "./");
/// assert_eq!(TargetFolder::new("~/www").as_str(), "./www");
/// assert_eq!(TargetFolder::new("/srv/www").as_str(), "/srv/www");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetFolder(String);

impl TargetFolder {
    /// Normalizes a configured target folder.
    pub fn new(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        match raw.strip_prefix("~/") {
            Some(rest) => Self(format!("./{rest}")),
            None => Self(raw.to_owned()),
        }
    }

    /// The folder as a remote path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TargetFolder {
    fn default() -> Self {
        Self("./".to_owned())
    }
}

/// Flags controlling a copy run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CopyOptions {
    /// Remove the target folder's contents before copying.
    pub clean_target_folder: bool,
    /// Replace files that already exist on the remote host.
    pub overwrite: bool,
    /// Treat an empty selection as fatal.
    pub fail_on_empty_source: bool,
    /// Upload every file directly into the target folder.
    pub flatten_folders: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            clean_target_folder: false,
            overwrite: true,
            fail_on_empty_source: false,
            flatten_folders: false,
        }
    }
}

/// Everything a copy run needs besides the remote session settings.
#[derive(Clone, Debug)]
pub struct CopyConfig {
    source_folder: PathBuf,
    contents: Vec<String>,
    target_folder: TargetFolder,
    options: CopyOptions,
    match_options: MatchOptions,
}

impl CopyConfig {
    /// Copies everything below `source_folder` into `./` with default
    /// options.
    pub fn new(source_folder: impl Into<PathBuf>) -> Self {
        Self {
            source_folder: source_folder.into(),
            contents: vec![CATCH_ALL_PATTERN.to_owned()],
            target_folder: TargetFolder::default(),
            options: CopyOptions::default(),
            match_options: MatchOptions::for_host(),
        }
    }

    /// Replaces the content patterns.
    #[must_use]
    pub fn with_contents<I, S>(mut self, contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contents = contents.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the remote destination root.
    #[must_use]
    pub fn with_target_folder(mut self, target_folder: TargetFolder) -> Self {
        self.target_folder = target_folder;
        self
    }

    /// Sets the copy flags.
    #[must_use]
    pub const fn with_options(mut self, options: CopyOptions) -> Self {
        self.options = options;
        self
    }

    /// Overrides host-dependent matching options.
    #[must_use]
    pub const fn with_match_options(mut self, match_options: MatchOptions) -> Self {
        self.match_options = match_options;
        self
    }

    /// Source folder as configured.
    pub fn source_folder(&self) -> &Path {
        &self.source_folder
    }

    /// Content patterns, in input order.
    pub fn contents(&self) -> &[String] {
        &self.contents
    }

    /// Remote destination root.
    pub const fn target_folder(&self) -> &TargetFolder {
        &self.target_folder
    }

    /// Copy flags.
    pub const fn options(&self) -> CopyOptions {
        self.options
    }

    /// Matching options.
    pub const fn match_options(&self) -> MatchOptions {
        self.match_options
    }

    /// Makes the source folder absolute and checks that it is a directory.
    pub fn resolve_source_folder(&self) -> Result<PathBuf, ConfigurationError> {
        let inaccessible = |source: io::Error| ConfigurationError::SourceInaccessible {
            path: self.source_folder.clone(),
            source,
        };

        let absolute = std::path::absolute(&self.source_folder).map_err(inaccessible)?;
        let metadata = fs::metadata(&absolute).map_err(inaccessible)?;
        if !metadata.is_dir() {
            return Err(ConfigurationError::SourceNotFolder {
                path: self.source_folder.clone(),
            });
        }
        Ok(absolute)
    }
}
