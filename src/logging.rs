//! Structured logging setup using `tracing-subscriber`.
//!
//! The drivers themselves only emit `tracing` events; installing a
//! subscriber is host business. [`init`] is a convenience for host
//! binaries and integration tests that want the standard setup.

use tracing_subscriber::EnvFilter;

/// Install a console subscriber writing human-readable output to stderr.
///
/// Controlled by `RUST_LOG` (default: `info`). Safe to call only once per
/// process; hosts with their own subscriber should skip it.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
