#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
//! crates/logging/src/lib.rs
//!
//! Diagnostic output for sshcopy.
//!
//! Every component logs through the `tracing` macros with a target below
//! `sshcopy::` (see [`LogTarget`]). The command line picks a [`Verbosity`],
//! [`VerbosityConfig`] turns it into per-target levels, and
//! [`init_tracing`] installs a subscriber that writes to standard error.
//! `RUST_LOG` replaces the computed filter entirely when it is set.
//!
//! ```
//! use logging::{LogTarget, VerbosityConfig};
//! use tracing::level_filters::LevelFilter;
//!
//! let config = VerbosityConfig::from_verbose_level(2);
//! assert_eq!(config.level(LogTarget::Filter), LevelFilter::DEBUG);
//! ```

mod config;
mod tracing_bridge;

pub use config::{LogTarget, Verbosity, VerbosityConfig};
pub use tracing_bridge::{LOG_ENV, env_filter, init_tracing};
