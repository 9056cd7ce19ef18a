//! Tracing subscriber setup for the CLI and the relay server.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a compact stderr logger.
///
/// `RUST_LOG` wins when set; otherwise `folio=info`, or `folio=debug` with
/// `verbose`. Calling twice is harmless (the second install is ignored).
pub fn init(verbose: bool) {
    let default = if verbose {
        "folio=debug,tower_http=debug,info"
    } else {
        "folio=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}
