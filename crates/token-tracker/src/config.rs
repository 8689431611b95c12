//! Tracker configuration.

use serde::Deserialize;

/// Tracker configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackerConfig {
    /// Maximum call records to retain (oldest are dropped first).
    /// Unset keeps the full history.
    #[serde(default)]
    pub history_limit: Option<usize>,
}
