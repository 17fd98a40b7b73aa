//! Diagnostic tracing for the command-line adapter.
//!
//! Diagnostics go to stderr so stdout only ever carries the board and the
//! replies meant for the player.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter applied when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "warn,run_from_cats=info";

/// Installs the global subscriber.
///
/// ```bash
/// RUST_LOG=run_from_cats_world=debug run-from-cats play
/// ```
pub(crate) fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
