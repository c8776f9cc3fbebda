use crate::slash_path;
use std::path::Path;
use tracing::debug;

/// Include pattern synthesized when only exclude patterns were supplied.
pub const CATCH_ALL_PATTERN: &str = "**";

/// A content pattern classified as include or exclude.
///
/// The leading run of `!` characters is counted; an odd count makes the
/// pattern an exclude. The rest of the pattern is joined onto the source root
/// to form the glob body. Exclude bodies are re-prefixed with the original `!`
/// run, include bodies are not.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContentPattern {
    raw: String,
    negation_count: usize,
    is_exclude: bool,
    body: String,
}

impl ContentPattern {
    /// Classifies `raw` relative to `root`.
    ///
    /// ```
    /// use filters::ContentPattern;
    /// use std::path::Path;
    ///
    /// let pattern = ContentPattern::resolve("!!!foo", Path::new("/src"));
    /// assert!(pattern.is_exclude());
    /// assert_eq!(pattern.negation_count(), 3);
    /// assert_eq!(pattern.body(), "!!!/src/foo");
    /// ```
    #[must_use]
    pub fn resolve(raw: &str, root: &Path) -> Self {
        let mut negate = false;
        let mut negation_count = 0;
        for c in raw.chars() {
            if c != '!' {
                break;
            }
            negate = !negate;
            negation_count += 1;
        }

        // `!` is a single byte, so the count doubles as a byte offset.
        let (bangs, remainder) = raw.split_at(negation_count);
        let joined = slash_path::join(&slash_path::to_slash(root), remainder);
        let body = if negate {
            format!("{bangs}{joined}")
        } else {
            joined
        };

        Self {
            raw: raw.to_owned(),
            negation_count,
            is_exclude: negate,
            body,
        }
    }

    /// Returns the catch-all include used when no include was supplied.
    #[must_use]
    pub fn catch_all() -> Self {
        Self {
            raw: CATCH_ALL_PATTERN.to_owned(),
            negation_count: 0,
            is_exclude: false,
            body: CATCH_ALL_PATTERN.to_owned(),
        }
    }

    /// Returns the pattern exactly as supplied.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the number of leading `!` characters.
    #[must_use]
    pub const fn negation_count(&self) -> usize {
        self.negation_count
    }

    /// Reports whether the pattern belongs to the exclude bucket.
    #[must_use]
    pub const fn is_exclude(&self) -> bool {
        self.is_exclude
    }

    /// Returns the glob handed to the matcher.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Include and exclude patterns, each bucket in input order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PatternSet {
    includes: Vec<ContentPattern>,
    excludes: Vec<ContentPattern>,
}

impl PatternSet {
    /// Classifies every pattern relative to `root`.
    ///
    /// Patterns are trimmed before classification. When the include bucket
    /// ends up empty while excludes exist, [`CATCH_ALL_PATTERN`] is added so
    /// the excludes have something to narrow.
    pub fn resolve<I, S>(patterns: I, root: &Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();

        for raw in patterns {
            let pattern = ContentPattern::resolve(raw.as_ref().trim(), root);
            if pattern.is_exclude() {
                debug!(target: "sshcopy::filter", "exclude content pattern: {}", pattern.raw());
                set.excludes.push(pattern);
            } else {
                debug!(target: "sshcopy::filter", "include content pattern: {}", pattern.raw());
                set.includes.push(pattern);
            }
        }

        if set.includes.is_empty() && !set.excludes.is_empty() {
            set.includes.push(ContentPattern::catch_all());
        }

        set
    }

    /// Returns the include patterns.
    #[must_use]
    pub fn includes(&self) -> &[ContentPattern] {
        &self.includes
    }

    /// Returns the exclude patterns.
    #[must_use]
    pub fn excludes(&self) -> &[ContentPattern] {
        &self.excludes
    }

    /// Returns `true` when neither bucket holds a pattern.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }
}
