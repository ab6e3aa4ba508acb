//! Logging initialization for the `ward` binary
//!
//! Everything goes to stderr so stdout carries only command output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` takes precedence over `config.level`.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::registry().with(build_env_filter(config));

    if config.json {
        let layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr);
        subscriber
            .with(layer)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install JSON subscriber: {e}"))?;
    } else {
        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(std::io::stderr);
        subscriber
            .with(layer)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install subscriber: {e}"))?;
    }

    tracing::debug!(level = %config.level, json = config.json, "Logging initialized");
    Ok(())
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)))
}

fn default_directives(level: &str) -> String {
    format!("ward={level},ward_client={level},ward_store={level},reqwest=warn,hyper=warn")
}
