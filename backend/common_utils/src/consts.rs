//! Constants and the runtime environment selector.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Header carrying the per-request correlation id
pub const X_REQUEST_ID: &str = "x-request-id";

/// Prefix for environment variables that override configuration values
pub const ENV_PREFIX: &str = "FESTPAY";

/// Env variable that selects the configuration file
pub const RUN_ENV: &str = "RUN_ENV";

/// Env variable holding the public origin of the single-page application
pub const APP_PUBLIC_URL: &str = "APP_PUBLIC_URL";

/// Public origin used when nothing usable is configured
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";

/// Form / query field PayU uses for the merchant transaction id
pub const PAYU_TXN_ID_FIELD: &str = "txnid";

/// Total request timeout for calls to the verification authority
pub const VERIFICATION_TIMEOUT_MS: u64 = 10_000;

/// Delay before navigating away from a success or failed verdict
pub const TERMINAL_NAVIGATION_DELAY_MS: u64 = 2_000;

/// Delay before navigating away after the verification call itself failed
pub const ERROR_NAVIGATION_DELAY_MS: u64 = 3_000;

/// Current environment.
#[derive(
    Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Env {
    /// Development environment.
    #[default]
    Development,
    /// Sandbox environment.
    Sandbox,
    /// Production environment.
    Production,
}

impl Env {
    /// Environment picked from `RUN_ENV`, falling back to the build profile default.
    pub fn current_env() -> Self {
        #[cfg(debug_assertions)]
        let default_env = Self::Development;
        #[cfg(not(debug_assertions))]
        let default_env = Self::Production;

        std::env::var(RUN_ENV).map_or(default_env, |value| value.parse().unwrap_or(default_env))
    }

    /// File name of the configuration for this environment, relative to `config/`.
    pub const fn config_path(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Sandbox => "sandbox.toml",
            Self::Production => "production.toml",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Env;

    #[test]
    fn env_parses_case_insensitively() {
        assert_eq!("Production".parse::<Env>().ok(), Some(Env::Production));
        assert_eq!("sandbox".parse::<Env>().ok(), Some(Env::Sandbox));
        assert!("staging".parse::<Env>().is_err());
    }

    #[test]
    fn env_maps_to_config_file() {
        assert_eq!(Env::Development.config_path(), "development.toml");
        assert_eq!(Env::Production.to_string(), "production");
    }
}
