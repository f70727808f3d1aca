//! # Telemetry
//!
//! Installs the global `tracing` subscriber.
//!
//! `RUST_LOG` takes precedence over the configured level, so
//! `RUST_LOG=limo_quote=debug,tower_http=debug` works as usual.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::config::{LogFormat, LoggingSettings};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns `ApplicationError::Configuration` if a subscriber is already
/// installed.
pub fn init_tracing(settings: &LoggingSettings) -> ApplicationResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let result = match settings.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(env_filter)
            .try_init(),
        LogFormat::Compact => tracing_subscriber::fmt()
            .compact()
            .with_env_filter(env_filter)
            .try_init(),
    };

    result.map_err(|e| ApplicationError::configuration(format!("failed to install logger: {e}")))
}
