//! crates/logging/src/tracing_bridge.rs
//! Subscriber installation for the `sshcopy::*` targets.
//!
//! Events are written to standard error through the `fmt` layer. The filter
//! comes from `RUST_LOG` when it is set and parses, otherwise from the
//! directives of a [`VerbosityConfig`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! init_tracing(&VerbosityConfig::from_verbose_level(1));
//! tracing::info!(target: "sshcopy::copy", "copying file");
//! ```

use super::config::VerbosityConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable that overrides the verbosity flags.
pub const LOG_ENV: &str = "RUST_LOG";

/// Builds the event filter for `config`, honouring `RUST_LOG`.
pub fn env_filter(config: &VerbosityConfig) -> EnvFilter {
    filter_from(config, std::env::var(LOG_ENV).ok().as_deref())
}

fn filter_from(config: &VerbosityConfig, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(config.directives()))
}

/// Installs the global subscriber.
///
/// Returns `false` when a subscriber was already installed, which leaves the
/// existing one in place.
pub fn init_tracing(config: &VerbosityConfig) -> bool {
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(layer)
        .try_init()
        .is_ok()
}
