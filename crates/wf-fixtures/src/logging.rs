//! Tracing setup for test binaries.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `wf_db=debug`.
pub const LOG_ENV: &str = "WF_LOG";

/// Install a global fmt subscriber.
///
/// The filter comes from `WF_LOG`, falling back to `debug` when `verbose`
/// and `warn` otherwise. Output goes through the test writer so
/// `cargo test` captures it per test.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn try_init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

/// Like [`try_init_tracing`], but a subscriber installed earlier (by another
/// test in the same binary) is kept.
pub fn init_tracing(verbose: bool) {
    if let Err(error) = try_init_tracing(verbose) {
        tracing::trace!(%error, "tracing already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_tracing(false);
        init_tracing(true);
        assert!(try_init_tracing(false).is_err());
    }
}
