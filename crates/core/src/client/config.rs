use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:3030/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Content API client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL the `/content` resource hangs off, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
#[error("{key} must be a whole number of seconds, got {value:?}")]
pub struct ClientConfigError {
    pub key: &'static str,
    pub value: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load from `CONTENT_API_URL` and `CONTENT_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ClientConfigError> {
        let mut config =
            Self::new(env::var("CONTENT_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()));
        if let Ok(raw) = env::var("CONTENT_API_TIMEOUT_SECS") {
            let secs = raw.parse().map_err(|_| ClientConfigError {
                key: "CONTENT_API_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = ClientConfig::new("http://example.test/api/");
        assert_eq!(config.base_url, "http://example.test/api");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
