//!
//! Logger-specific config.
//!

use std::str::FromStr;

use serde::Deserialize;

/// `[log]` section.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Log {
    pub console: LogConsole,
}

/// `[log.console]` section.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LogConsole {
    pub enabled: bool,
    /// Level applied to the crates the service watches
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub log_format: LogFormat,
    /// `EnvFilter` directive, e.g. `callback_server=debug,tower_http=info`.
    /// `RUST_LOG` wins when both are present.
    #[serde(default)]
    pub filtering_directive: Option<String>,
}

/// Verbosity read from config; accepts any case (`debug`, `WARN`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Level(tracing::Level);

impl Level {
    pub fn into_level(self) -> tracing::Level {
        self.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Self(tracing::Level::INFO)
    }
}

impl TryFrom<String> for Level {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        tracing::Level::from_str(raw.trim())
            .map(Self)
            .map_err(|_| format!("unknown log level `{raw}`"))
    }
}

/// Console output format.
#[derive(Default, Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, for local development
    Default,
    #[default]
    Json,
}
