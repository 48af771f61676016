//! Logger setup

use env_logger::{Builder, Env};

/// Filter used for a given `-v` count, falling back to the configured level
pub fn log_filter(verbosity: u8, configured: &str) -> &str {
    match verbosity {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global logger. `RUST_LOG` wins over everything else.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbosity: u8, configured: &str) {
    let filter = log_filter(verbosity, configured);
    let _ = Builder::from_env(Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
