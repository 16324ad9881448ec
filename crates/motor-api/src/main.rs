//! `motor-api` binary entrypoint.
//!
//! Loads configuration from environment variables and starts the HTTP server.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use std::sync::Arc;

use anyhow::{Context as _, Result};

use motor_api::config::Config;
use motor_api::server::Server;
use motor_core::observability::{LogFormat, init_logging};
use motor_core::{MemoryMotorDataStore, MotorDataBackend};

fn choose_log_format(config: &Config) -> LogFormat {
    if config.debug {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    init_logging(choose_log_format(&config));

    let backend: Arc<dyn MotorDataBackend> = if let Some(path) = config.fixtures_path.as_deref() {
        tracing::info!(path = %path, "Loading motor data fixtures");
        Arc::new(
            MemoryMotorDataStore::from_fixtures(path)
                .with_context(|| format!("load fixtures from {path}"))?,
        )
    } else {
        if !config.debug {
            anyhow::bail!("MOTOR_FIXTURES_PATH is required when MOTOR_DEBUG=false");
        }
        tracing::warn!("MOTOR_FIXTURES_PATH not set; serving an empty in-memory store (debug only)");
        Arc::new(MemoryMotorDataStore::new())
    };

    let server = Server::with_backend(config, backend);
    server.serve().await?;
    Ok(())
}
