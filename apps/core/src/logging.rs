//! Tracing initialization.

use std::sync::Once;

use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

const SERVICE_NAME: &str = "telecom-chat";

/// Installs the global subscriber.
///
/// Levels come from `RUST_LOG` (default `info`). With `LOG_FORMAT=json` the
/// output is bunyan-formatted JSON lines, otherwise human-readable text.
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let json = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if json {
            tracing_subscriber::registry()
                .with(filter)
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(SERVICE_NAME.to_string(), std::io::stdout))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true))
                .init();
        }
    });
}
