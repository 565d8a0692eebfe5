//! Logging set-up for hosts embedding the initializer.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogConfig, LogFormat};

static INIT: Once = Once::new();

/// Install the global `tracing` subscriber.
///
/// Call once at startup; later calls are no-ops. An invalid filter falls
/// back to `info`.
pub fn init_logging(config: &LogConfig) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_new(config.filter_or_default()).unwrap_or_else(|_| EnvFilter::new("info"));

        match config.format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json())
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().pretty())
                    .init();
            }
        }
    });
}
