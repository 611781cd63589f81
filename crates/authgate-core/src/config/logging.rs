//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Tracing subscriber settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
    /// Output format: `json` or `pretty`.
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

fn default_level() -> String {
    "info,sqlx=warn".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}
