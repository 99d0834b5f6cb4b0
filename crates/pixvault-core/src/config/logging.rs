//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Tracing subscriber settings. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive such as `"info"` or `"debug,tower_http=info"`.
    #[serde(default = "default_level")]
    pub level: String,
    /// `"json"` for structured output, anything else prints human-readable lines.
    #[serde(default = "default_format")]
    pub format: String,
}

impl LoggingConfig {
    /// Whether structured JSON output was requested.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
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
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}
