//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the Ratchet tracing/logging system.
///
/// Reads `RATCHET_LOG` for per-module log levels, e.g.
/// `RATCHET_LOG=ratchet_engine::verify=debug,ratchet_core=warn`.
/// Falls back to `ratchet_core=info,ratchet_engine=info` if unset or invalid.
///
/// Idempotent: calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("RATCHET_LOG")
            .unwrap_or_else(|_| EnvFilter::new("ratchet_core=info,ratchet_engine=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init();
    });
}
