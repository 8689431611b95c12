//! Configuration for the usage report.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use token_tracker::TrackerConfig;

/// Report configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Report input and output
    #[serde(default)]
    pub report: ReportConfig,

    /// Tracker configuration
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Log file to scan (stdin when unset)
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// Output format for the final summary
    #[serde(default)]
    pub format: ReportFormat,

    /// Abort on the first malformed TOKEN_USAGE line instead of skipping it
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Single `TOKEN_SUMMARY:` line
    #[default]
    Text,
    /// Pretty-printed summary including call history
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_source(
            config::Environment::default()
                .separator("__")
                .try_parsing(false),
        )
    }

    /// Build configuration from an explicit `config` source.
    pub fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
