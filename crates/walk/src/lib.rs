#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` enumerates the regular files below a source folder. The result is a
//! flat list of paths that the pattern matcher in the `filters` crate consumes;
//! directories are descended into but never reported. Ordering is stable
//! across runs because the entries of every directory are sorted before they
//! are visited.
//!
//! # Design
//!
//! - [`FileEnumerator`] holds the root and performs the traversal with
//!   [`FileEnumerator::files`].
//! - [`list_files`] is the shorthand used by the transfer driver.
//! - [`WalkError`] describes filesystem failures and always carries the
//!   offending path.
//!
//! # Invariants
//!
//! - Every returned path starts with the root exactly as it was supplied, so
//!   callers can strip the root prefix textually.
//! - Directories reached through symlinks are visited at most once; canonical
//!   paths are tracked to break cycles.
//! - Traversal never panics; failures are reported through [`WalkError`].
//!
//! # Examples
//!
//! ```
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let root = temp.path().join("site");
//! fs::create_dir_all(root.join("css"))?;
//! fs::write(root.join("index.html"), b"<html>")?;
//! fs::write(root.join("css/site.css"), b"body {}")?;
//!
//! let files = walk::list_files(&root)?;
//! assert_eq!(files, vec![root.join("css/site.css"), root.join("index.html")]);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod enumerator;
mod error;

pub use enumerator::{FileEnumerator, list_files};
pub use error::{WalkError, WalkErrorKind};

#[cfg(test)]
mod tests;
