//! Structured logging for the analyzer.
//!
//! Logging happens at effect boundaries (per-class parse failures,
//! configuration fallbacks, phase progress), never inside the pure
//! parsing and metrics code.
//!
//! Control verbosity with `RUST_LOG`:
//!
//! ```bash
//! # Default: warnings and errors only
//! classdep analyze target/classes
//!
//! # Show phase-level progress
//! RUST_LOG=info classdep analyze target/classes
//!
//! # Per-class detail
//! RUST_LOG=debug classdep analyze target/classes
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Filtering comes from the `RUST_LOG` environment variable; the default
/// level is `warn`.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
