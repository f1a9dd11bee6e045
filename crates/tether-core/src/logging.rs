//! Logging setup built on `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Default filter: protocol transitions at debug, everything else at info.
pub const DEFAULT_FILTER: &str = "info,tether_dock=debug,tether_winit=debug,winit=info";

/// Install the global fmt subscriber with [`DEFAULT_FILTER`].
///
/// `RUST_LOG` takes precedence when it is set.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install the global fmt subscriber with a custom filter directive.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_with_filter(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::trace!("tracing subscriber already installed");
    }
}
