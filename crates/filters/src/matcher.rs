use crate::glob::CompiledGlob;
use crate::slash_path::to_slash;
use crate::{FilterError, MatchOptions, PatternSet};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::debug;

/// Returns the paths matched by `pattern`, in the order they were supplied.
///
/// `pattern` uses the matcher's conventions: a leading odd run of `!`
/// negates it and a pattern without `/` matches file names.
pub fn match_paths(
    paths: &[PathBuf],
    pattern: &str,
    options: MatchOptions,
) -> Result<Vec<PathBuf>, FilterError> {
    let glob = CompiledGlob::new(pattern, options)?;
    Ok(paths
        .iter()
        .filter(|path| glob.is_match(&to_slash(path)))
        .cloned()
        .collect())
}

/// Selects the files to transfer from `candidates`.
///
/// Every include runs against the full candidate list and contributes the
/// matches it has not seen yet, so a file keeps the position of its first
/// match. Every exclude then runs against the current selection and replaces
/// it with its matches. An empty selection is not an error.
pub fn select_files(
    candidates: &[PathBuf],
    patterns: &PatternSet,
    options: MatchOptions,
) -> Result<Vec<PathBuf>, FilterError> {
    let mut seen = HashSet::new();
    let mut selected = Vec::new();

    for pattern in patterns.includes() {
        debug!(target: "sshcopy::filter", "include matching {}", pattern.body());
        let matches = match_paths(candidates, pattern.body(), options)?;
        debug!(target: "sshcopy::filter", "include matched {} files", matches.len());
        for path in matches {
            if seen.insert(path.clone()) {
                selected.push(path);
            }
        }
    }

    for pattern in patterns.excludes() {
        debug!(target: "sshcopy::filter", "exclude matching {}", pattern.body());
        selected = match_paths(&selected, pattern.body(), options)?;
        debug!(target: "sshcopy::filter", "exclude matched {} files", selected.len());
    }

    Ok(selected)
}
