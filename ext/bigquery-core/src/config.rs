//! Client configuration.

/// Environment variable pointing the client at an emulator
pub const EMULATOR_HOST_ENV: &str = "BIGQUERY_EMULATOR_HOST";

/// Default host for the JSON API
pub const DEFAULT_HOST: &str = "https://bigquery.googleapis.com";

/// The API host, honoring the emulator override
pub fn api_host() -> String {
    match std::env::var(EMULATOR_HOST_ENV) {
        Ok(host) => {
            tracing::debug!(%host, "using emulator host from {}", EMULATOR_HOST_ENV);
            host
        }
        Err(_) => DEFAULT_HOST.to_string(),
    }
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the JSON API
    pub host: String,
}

impl ClientConfig {
    /// Configuration read from the environment
    pub fn from_env() -> Self {
        Self { host: api_host() }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
        }
    }
}
