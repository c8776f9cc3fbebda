use crate::FilterError;
use globset::{Glob, GlobBuilder, GlobMatcher};

/// Host-dependent matching options.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MatchOptions {
    case_insensitive: bool,
}

impl MatchOptions {
    /// Options for a host with case-sensitive paths.
    #[must_use]
    pub const fn case_sensitive() -> Self {
        Self {
            case_insensitive: false,
        }
    }

    /// Options for a host with case-insensitive paths.
    #[must_use]
    pub const fn case_insensitive() -> Self {
        Self {
            case_insensitive: true,
        }
    }

    /// Options matching the platform this binary was built for.
    ///
    /// Windows paths compare without regard to case; everything else is
    /// case-sensitive.
    #[must_use]
    pub const fn for_host() -> Self {
        if cfg!(windows) {
            Self::case_insensitive()
        } else {
            Self::case_sensitive()
        }
    }

    /// Reports whether letters compare without regard to case.
    #[must_use]
    pub const fn is_case_insensitive(self) -> bool {
        self.case_insensitive
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self::for_host()
    }
}

/// A compiled glob with its negation and base-name flags resolved.
#[derive(Clone, Debug)]
pub(crate) struct CompiledGlob {
    matcher: GlobMatcher,
    negated: bool,
    match_base: bool,
}

impl CompiledGlob {
    /// Compiles `pattern`.
    ///
    /// A leading run of `!` with odd length negates the glob; an even run is
    /// dropped. A glob without `/` matches against the final path component.
    /// When the body does not parse, unpaired `[`, `{` and `}` are retried as
    /// literal characters before the error is reported.
    pub(crate) fn new(pattern: &str, options: MatchOptions) -> Result<Self, FilterError> {
        let bangs = pattern.bytes().take_while(|b| *b == b'!').count();
        let body = &pattern[bangs..];

        let glob = build(body, options)
            .or_else(|error| match escape_unbalanced(body) {
                Some(escaped) => build(&escaped, options).map_err(|_| error),
                None => Err(error),
            })
            .map_err(|error| FilterError::new(pattern.to_owned(), error))?;

        Ok(Self {
            matcher: glob.compile_matcher(),
            negated: bangs % 2 == 1,
            match_base: !body.contains('/'),
        })
    }

    /// Tests a `/`-separated path.
    pub(crate) fn is_match(&self, path: &str) -> bool {
        let subject = if self.match_base {
            path.rsplit('/').next().unwrap_or(path)
        } else {
            path
        };
        self.matcher.is_match(subject) != self.negated
    }
}

fn build(body: &str, options: MatchOptions) -> Result<Glob, globset::Error> {
    GlobBuilder::new(body)
        .literal_separator(true)
        .case_insensitive(options.case_insensitive)
        .build()
}

/// Rewrites every `[`, `{` or `}` that has no partner as a one-character
/// class, so it matches itself. Returns `None` when all of them pair up.
///
/// A folder named `site{old` is legal on disk and ends up inside every
/// rooted pattern.
fn escape_unbalanced(body: &str) -> Option<String> {
    let chars: Vec<char> = body.chars().collect();
    let mut literal = vec![false; chars.len()];
    let mut open_braces = Vec::new();

    let mut index = 0;
    while index < chars.len() {
        match chars[index] {
            '\\' => index += 1,
            '[' => match class_end(&chars, index) {
                Some(end) => index = end,
                None => literal[index] = true,
            },
            '{' => open_braces.push(index),
            '}' => {
                if open_braces.pop().is_none() {
                    literal[index] = true;
                }
            }
            _ => {}
        }
        index += 1;
    }
    for index in open_braces {
        literal[index] = true;
    }

    if !literal.contains(&true) {
        return None;
    }

    let mut escaped = String::with_capacity(body.len() + 4);
    for (ch, literal) in chars.into_iter().zip(literal) {
        if literal {
            escaped.push('[');
            escaped.push(ch);
            escaped.push(']');
        } else {
            escaped.push(ch);
        }
    }
    Some(escaped)
}

/// Index of the `]` closing the class opened at `start`.
///
/// A `]` directly after the opening bracket (or after `!`/`^`) is a member
/// of the class.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut first = start + 1;
    if matches!(chars.get(first), Some('!' | '^')) {
        first += 1;
    }
    if chars.get(first) == Some(&']') {
        first += 1;
    }
    chars
        .get(first..)?
        .iter()
        .position(|ch| *ch == ']')
        .map(|offset| first + offset)
}
