//! Environment-driven configuration.

use std::time::Duration;

use medvault_session::ClientConfig;

/// Default backend origin when `MEDVAULT_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
}

impl ShellConfig {
    /// Read configuration from the environment, with logged fallbacks.
    pub fn from_env() -> Self {
        let api_base_url = std::env::var("MEDVAULT_API_URL").unwrap_or_else(|_| {
            tracing::warn!("MEDVAULT_API_URL not set; using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });

        let request_timeout = std::env::var("MEDVAULT_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(ClientConfig::DEFAULT_TIMEOUT);

        Self {
            api_base_url,
            request_timeout,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_base_url.as_str()).with_timeout(self.request_timeout)
    }
}
