//! Forward-slash path joining shared by glob bodies and remote paths.
//!
//! Both the pattern bodies and the remote target paths are plain strings with
//! `/` separators, independent of the host's native separator. Joining
//! normalizes the result: empty and `.` segments disappear, `..` consumes the
//! preceding segment, and a trailing `/` survives.

use std::borrow::Cow;
use std::path::Path;

/// Joins `base` and `tail` with a `/` and normalizes the result.
///
/// ```
/// use filters::slash_path::join;
///
/// assert_eq!(join("./", "a/x.txt"), "a/x.txt");
/// assert_eq!(join("/srv/www/", "./**"), "/srv/www/**");
/// assert_eq!(join("deploy", "../x"), "x");
/// ```
#[must_use]
pub fn join(base: &str, tail: &str) -> String {
    match (base.is_empty(), tail.is_empty()) {
        (true, true) => normalize(""),
        (true, false) => normalize(tail),
        (false, true) => normalize(base),
        (false, false) => normalize(&format!("{base}/{tail}")),
    }
}

/// Normalizes a `/`-separated path.
///
/// An empty result becomes `.`; an absolute path never climbs above `/`.
#[must_use]
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_owned();
    }

    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let mut normalized = segments.join("/");
    if absolute {
        normalized.insert(0, '/');
    }
    if normalized.is_empty() {
        normalized.push('.');
    }
    if trailing && !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// Renders a local path with `/` separators.
///
/// Only Windows paths change; elsewhere the lossy string form is returned.
#[must_use]
pub fn to_slash(path: &Path) -> Cow<'_, str> {
    let text = path.to_string_lossy();
    if cfg!(windows) && text.contains('\\') {
        Cow::Owned(text.replace('\\', "/"))
    } else {
        text
    }
}
