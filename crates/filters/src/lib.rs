#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` turns the user's content patterns into the ordered list of files
//! that sshcopy uploads. Patterns are glob expressions relative to the source
//! folder; a leading run of `!` characters flips a pattern between "include"
//! and "exclude" depending on its parity.
//!
//! # Design
//!
//! - [`ContentPattern`] classifies a single raw pattern: it counts the leading
//!   `!` characters, decides whether the pattern excludes, and joins the
//!   remainder onto the source root.
//! - [`PatternSet`] holds the include and exclude buckets in input order and
//!   synthesizes a catch-all `**` include when only excludes were supplied.
//! - [`select_files`] applies every include to the candidate list (deduplicated,
//!   first match wins the position) and then narrows the result with each
//!   exclude in turn.
//! - [`MatchOptions`] carries the host-dependent case sensitivity.
//!
//! # Matching rules
//!
//! - A glob whose text contains no `/` is matched against the file name only.
//! - Hidden files are matched by wildcards like any other file.
//! - `*` and `?` never cross a `/`; `**` does.
//! - A glob that starts with an odd number of `!` is negated: it matches every
//!   path the rest of the glob does not. Exclude bodies keep their `!` run, so
//!   applying them keeps everything outside the excluded set.
//!
//! # Errors
//!
//! [`select_files`] reports [`FilterError`] when a pattern body is not a valid
//! glob. The error keeps the offending pattern and the [`globset::Error`].
//!
//! # Examples
//!
//! ```
//! use filters::{MatchOptions, PatternSet, select_files};
//! use std::path::{Path, PathBuf};
//!
//! let root = Path::new("/srv/site");
//! let patterns = PatternSet::resolve(["**", "!drafts/**"], root);
//! let candidates = vec![
//!     PathBuf::from("/srv/site/index.html"),
//!     PathBuf::from("/srv/site/drafts/post.md"),
//!     PathBuf::from("/srv/site/.htaccess"),
//! ];
//!
//! let selected = select_files(&candidates, &patterns, MatchOptions::case_sensitive()).unwrap();
//! assert_eq!(
//!     selected,
//!     vec![PathBuf::from("/srv/site/index.html"), PathBuf::from("/srv/site/.htaccess")]
//! );
//! ```

mod error;
mod glob;
mod matcher;
mod pattern;
pub mod slash_path;

pub use error::FilterError;
pub use glob::MatchOptions;
pub use matcher::{match_paths, select_files};
pub use pattern::{CATCH_ALL_PATTERN, ContentPattern, PatternSet};
