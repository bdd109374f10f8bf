//! Logging initialization
//!
//! `RUST_LOG` wins when set. Otherwise warnings are shown, and `--verbose`
//! turns on debug output. Logs go to stderr so `--json` output stays clean.

use tracing_subscriber::{
    fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
