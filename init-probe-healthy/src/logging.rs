//! tracing subscriber set-up for the probe process

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Output encoding of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(anyhow::anyhow!("Invalid log format: {other}")),
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `LOG_LEVEL` when set. Container runtimes collect
/// stdout, so there is no file output.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level = Level::from_str(config.level.trim())
        .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {e}", config.level))?;
    let format = config.format.parse::<LogFormat>()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_line_number(true))
            .try_init()?,
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(false))
            .try_init()?,
    }

    Ok(())
}
