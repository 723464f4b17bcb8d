//! `tracing` subscriber setup shared by both binaries.
//!
//! Logs always go to stderr: the CLI prints its pages on stdout and the MCP
//! server speaks the protocol over stdout.

use anyhow::{anyhow, Result};
use std::env;
use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            default_filter: "warn,pokedex=info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Reads `POKEDEX_LOG_FORMAT` (`json` or `pretty`).
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(format) = env::var("POKEDEX_LOG_FORMAT") {
            config.format = parse_format(&format).unwrap_or(config.format);
        }
        config
    }
}

fn parse_format(raw: &str) -> Option<LogFormat> {
    match raw.trim().to_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" | "text" => Some(LogFormat::Pretty),
        _ => None,
    }
}

pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_target(true)
            .with_current_span(true)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    tracing::debug!(format = ?config.format, "logging initialized");
    Ok(())
}
