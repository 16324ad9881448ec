//! Observability helpers.
//!
//! Structured logging with consistent span fields across the motor crates.

use std::sync::Once;
use tracing::Span;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logs (for production).
    Json,
    /// Pretty-printed logs (for development).
    #[default]
    Pretty,
}

/// Initializes the logging subsystem.
///
/// Call once at application startup. Safe to call multiple times;
/// subsequent calls are no-ops.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log levels (e.g., `info`, `motor_api=debug`)
///
/// # Example
///
/// ```rust
/// use motor_core::observability::{init_logging, LogFormat};
///
/// init_logging(LogFormat::Pretty);
/// ```
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
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

/// Creates a span for a motor data lookup.
///
/// # Example
///
/// ```rust
/// use motor_core::observability::motor_data_span;
///
/// let span = motor_data_span("OilFilterTorqueMap", 537_152);
/// let _guard = span.enter();
/// ```
#[must_use]
pub fn motor_data_span(data_type: &str, vehicle_to_engine_config_id: i32) -> Span {
    tracing::info_span!(
        "motor_data",
        data_type = data_type,
        vehicle_to_engine_config_id = vehicle_to_engine_config_id,
    )
}
