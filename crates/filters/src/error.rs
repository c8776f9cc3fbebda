use thiserror::Error;

/// A content pattern that globset refused to compile.
///
/// The pattern is reported after root joining, since that is the string the
/// matcher compiled.
#[derive(Debug, Error)]
#[error("invalid content pattern '{pattern}': {source}")]
pub struct FilterError {
    pattern: String,
    #[source]
    source: globset::Error,
}

impl FilterError {
    pub(crate) const fn new(pattern: String, source: globset::Error) -> Self {
        Self { pattern, source }
    }

    /// Pattern as handed to the matcher.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
