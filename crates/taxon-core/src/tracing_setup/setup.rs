//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

static INIT: Once = Once::new();

/// Initialize logging with default settings.
///
/// Reads `TAXON_LOG` for per-crate levels, e.g.
/// `TAXON_LOG=taxon_taxonomy=debug,taxon_differ=info`. Falls back to `info`.
/// Idempotent.
pub fn init_tracing() {
    init_tracing_with_config(&ObservabilityConfig::default());
}

/// Initialize logging from configuration. `TAXON_LOG` still wins when set.
pub fn init_tracing_with_config(config: &ObservabilityConfig) {
    let level = config.log_level.clone();
    let json = config.json;
    INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_env("TAXON_LOG").unwrap_or_else(|_| EnvFilter::new(level));

        if json {
            tracing_subscriber::registry()
                .with(fmt::layer().json().with_target(true).with_thread_ids(true))
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .init();
        }
    });
}
