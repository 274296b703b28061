use crate::error::{ConfigError, Notice};
use reqwest::Url;
use std::time::Duration;

/// Environment variable holding the inference endpoint URL.
pub const ENDPOINT_ENV: &str = "LEAF_API_URL";

/// Upper bound for one prediction request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Settings for the upload client, built once at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let endpoint = std::env::var(ENDPOINT_ENV).ok();
        if endpoint.is_none() {
            tracing::warn!("{ENDPOINT_ENV} is not set; uploads are disabled");
        }
        Self::default().with_endpoint(endpoint)
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let raw = self
            .endpoint
            .as_deref()
            .ok_or(ConfigError::MissingEndpoint)?;
        let url = Url::parse(raw).map_err(|_| ConfigError::InvalidEndpoint(raw.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigError::InvalidEndpoint(raw.to_string())),
        }
    }

    /// Startup notice when uploads cannot work with this configuration.
    pub fn advisory(&self) -> Option<Notice> {
        self.endpoint_url().err().map(|e| e.notice())
    }
}
