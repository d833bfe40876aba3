//! stderr logging for the command line tool

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose || cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Initialize the fmt subscriber on stderr so stdout stays clean for JSON output
///
/// `--verbose` forces debug output; otherwise `RUST_LOG` wins over the default.
pub fn setup_logging(verbose: bool) {
    let directive = default_directive(verbose);
    let filter = if verbose {
        EnvFilter::new(directive)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
    };

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        tracing::warn!("Global tracing subscriber already set; keeping it");
        return;
    }
    tracing::debug!(default = directive, "logging initialized");
}
