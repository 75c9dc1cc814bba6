//! Tracing setup for binaries built on top of the council config

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global subscriber. `RUST_LOG` wins over the `debug` flag.
///
/// Errors if a global subscriber is already installed.
pub fn init(debug: bool) -> Result<(), TryInitError> {
    let filter = if debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
}
