//! Log setup
//!
//! Logs always go to stderr: stdout is reserved for the status line.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pick a log level from the `-q` and `-v` flags
pub fn log_level(quiet: bool, verbose: u8) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    }
}

/// Install the global subscriber; `RUST_LOG` overrides the flags
pub fn init_logging(quiet: bool, verbose: u8) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level(quiet, verbose).into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
