pub mod config;
pub mod error;

pub use config::{ApiConfig, Config, DisplayConfig, LocationConfig, RefreshConfig, ValidationResult};
pub use error::{AppError, ConfigError, FeedError, NetworkError, RenderFailure};

use anyhow::Result;

/// Initialize the core application.
///
/// `RUST_LOG` always wins; otherwise the filter is `debug` when the config
/// debug flag is set and `info` when it is not.
pub fn init(debug: bool) -> Result<()> {
    let default_filter = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!("Aurora Watch core initialized");
    Ok(())
}
