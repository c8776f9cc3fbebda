//! crates/logging/src/config.rs
//! Verbosity levels and the per-target filter they produce.

use std::fmt;
use tracing::Level;
use tracing::level_filters::LevelFilter;

/// Diagnostic areas, one per tracing target below `sshcopy::`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogTarget {
    /// Pattern classification and match counts.
    Filter,
    /// Source tree enumeration.
    Flist,
    /// Session setup and teardown.
    Connect,
    /// Remote command output and exit status.
    Cmd,
    /// Per-file progress and failures.
    Copy,
    /// End-of-run totals.
    Stats,
}

impl LogTarget {
    /// Every target, in directive order.
    pub const ALL: [Self; 6] = [
        Self::Filter,
        Self::Flist,
        Self::Connect,
        Self::Cmd,
        Self::Copy,
        Self::Stats,
    ];

    /// Full tracing target name.
    pub const fn target(self) -> &'static str {
        match self {
            Self::Filter => "sshcopy::filter",
            Self::Flist => "sshcopy::flist",
            Self::Connect => "sshcopy::connect",
            Self::Cmd => "sshcopy::cmd",
            Self::Copy => "sshcopy::copy",
            Self::Stats => "sshcopy::stats",
        }
    }

    /// Parses the short name (`copy`) or the full target (`sshcopy::copy`).
    pub fn from_name(name: &str) -> Option<Self> {
        let full = if name.contains("::") {
            name.to_owned()
        } else {
            format!("sshcopy::{name}")
        };
        Self::ALL.into_iter().find(|target| target.target() == full)
    }
}

/// Coarse verbosity selected on the command line.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Progress, remote output and warnings.
    #[default]
    Normal,
    /// Adds pattern and enumeration details.
    Verbose,
    /// Everything sshcopy logs.
    Debug,
    /// Everything, including SSH library internals.
    Trace,
}

impl Verbosity {
    /// Maps a `-v` count.
    pub const fn from_verbose_level(level: u8) -> Self {
        match level {
            0 => Self::Normal,
            1 => Self::Verbose,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

/// Per-target levels derived from a [`Verbosity`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerbosityConfig {
    default: LevelFilter,
    levels: [LevelFilter; 6],
    libraries: LevelFilter,
}

impl VerbosityConfig {
    /// Creates the configuration for `verbosity`.
    pub const fn new(verbosity: Verbosity) -> Self {
        use LevelFilter as L;

        //                         filter    flist     connect   cmd       copy      stats
        let (default, levels, libraries) = match verbosity {
            Verbosity::Quiet => (L::ERROR, [L::ERROR; 6], L::ERROR),
            Verbosity::Normal => (
                L::WARN,
                [L::WARN, L::WARN, L::INFO, L::INFO, L::INFO, L::INFO],
                L::WARN,
            ),
            Verbosity::Verbose => (
                L::WARN,
                [L::INFO, L::INFO, L::INFO, L::INFO, L::DEBUG, L::INFO],
                L::WARN,
            ),
            Verbosity::Debug => (L::INFO, [L::DEBUG; 6], L::WARN),
            Verbosity::Trace => (L::DEBUG, [L::TRACE; 6], L::DEBUG),
        };

        Self {
            default,
            levels,
            libraries,
        }
    }

    /// Shorthand for `new(Verbosity::from_verbose_level(level))`.
    pub const fn from_verbose_level(level: u8) -> Self {
        Self::new(Verbosity::from_verbose_level(level))
    }

    /// Level for `target`.
    pub const fn level(&self, target: LogTarget) -> LevelFilter {
        self.levels[target as usize]
    }

    /// Overrides the level of one target.
    pub const fn set_level(&mut self, target: LogTarget, level: LevelFilter) {
        self.levels[target as usize] = level;
    }

    /// Applies a `target=level` token such as `copy=debug`.
    pub fn apply_token(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = token
            .split_once('=')
            .ok_or_else(|| format!("expected TARGET=LEVEL, got '{token}'"))?;
        let target =
            LogTarget::from_name(name.trim()).ok_or_else(|| format!("unknown log target: {name}"))?;
        let level = level
            .trim()
            .parse::<LevelFilter>()
            .map_err(|_| format!("unknown log level: {level}"))?;
        self.set_level(target, level);
        Ok(())
    }

    /// Renders the configuration as `EnvFilter` directives.
    ///
    /// ```
    /// use logging::{Verbosity, VerbosityConfig};
    ///
    /// let directives = VerbosityConfig::new(Verbosity::Quiet).directives();
    /// assert!(directives.starts_with("error,"));
    /// assert!(directives.contains("sshcopy::copy=error"));
    /// ```
    pub fn directives(&self) -> String {
        let mut directives = level_name(self.default).to_owned();
        for target in LogTarget::ALL {
            directives.push_str(&format!(",{}={}", target.target(), level_name(self.level(target))));
        }
        for library in ["russh", "russh_sftp"] {
            directives.push_str(&format!(",{library}={}", level_name(self.libraries)));
        }
        directives
    }
}

impl Default for VerbosityConfig {
    fn default() -> Self {
        Self::new(Verbosity::Normal)
    }
}

impl fmt::Display for VerbosityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.directives())
    }
}

const fn level_name(level: LevelFilter) -> &'static str {
    match level.into_level() {
        None => "off",
        Some(Level::ERROR) => "error",
        Some(Level::WARN) => "warn",
        Some(Level::INFO) => "info",
        Some(Level::DEBUG) => "debug",
        Some(Level::TRACE) => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_count_saturates_at_trace() {
        assert_eq!(Verbosity::from_verbose_level(0), Verbosity::Normal);
        assert_eq!(Verbosity::from_verbose_level(1), Verbosity::Verbose);
        assert_eq!(Verbosity::from_verbose_level(2), Verbosity::Debug);
        assert_eq!(Verbosity::from_verbose_level(3), Verbosity::Trace);
        assert_eq!(Verbosity::from_verbose_level(9), Verbosity::Trace);
    }

    #[test]
    fn normal_shows_progress_but_not_pattern_details() {
        let config = VerbosityConfig::default();
        assert_eq!(config.level(LogTarget::Copy), LevelFilter::INFO);
        assert_eq!(config.level(LogTarget::Cmd), LevelFilter::INFO);
        assert_eq!(config.level(LogTarget::Filter), LevelFilter::WARN);
    }

    #[test]
    fn more_verbosity_never_lowers_a_level() {
        let levels = [
            Verbosity::Quiet,
            Verbosity::Normal,
            Verbosity::Verbose,
            Verbosity::Debug,
            Verbosity::Trace,
        ];
        for pair in levels.windows(2) {
            let lower = VerbosityConfig::new(pair[0]);
            let higher = VerbosityConfig::new(pair[1]);
            for target in LogTarget::ALL {
                assert!(higher.level(target) >= lower.level(target), "{target:?}");
            }
        }
    }

    #[test]
    fn directives_list_every_target() {
        let directives = VerbosityConfig::from_verbose_level(2).directives();
        assert_eq!(
            directives,
            "info,sshcopy::filter=debug,sshcopy::flist=debug,sshcopy::connect=debug,\
             sshcopy::cmd=debug,sshcopy::copy=debug,sshcopy::stats=debug,\
             russh=warn,russh_sftp=warn"
        );
    }

    #[test]
    fn tokens_override_single_targets() {
        let mut config = VerbosityConfig::default();
        config.apply_token("filter=trace").expect("short name");
        config.apply_token("sshcopy::stats = off").expect("full name");
        assert_eq!(config.level(LogTarget::Filter), LevelFilter::TRACE);
        assert_eq!(config.level(LogTarget::Stats), LevelFilter::OFF);

        assert!(config.apply_token("copy").is_err());
        assert!(config.apply_token("bogus=info").is_err());
        assert!(config.apply_token("copy=loud").is_err());
    }
}
