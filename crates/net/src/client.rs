//! HTTP client with connection pooling

use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use vsixget_config::Config;
use vsixget_errors::{ConfigError, Error};

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300), // 5 minutes for large downloads
            connect_timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: vsixget_config::constants::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl NetConfig {
    /// Derive client settings from the loaded configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: config.network.timeout(),
            connect_timeout: config.network.connect_timeout(),
            user_agent: config.catalog.user_agent.clone(),
            ..Self::default()
        }
    }
}

/// HTTP client wrapper
///
/// Performs no retries; the resolver and the transfer engine own that policy.
#[derive(Clone)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created due to invalid configuration
    /// or if the underlying reqwest client fails to initialize.
    pub fn new(config: &NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ConfigError::ClientUnavailable {
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(&NetConfig::default())
    }

    /// Execute a GET request with extra headers
    ///
    /// # Errors
    ///
    /// Returns the transport error if no response was received.
    pub async fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<Response, reqwest::Error> {
        tracing::debug!(%url, ?headers, "GET");
        let mut request = self.client.get(url);
        for (key, value) in headers {
            request = request.header(*key, *value);
        }
        request.send().await
    }

    /// POST a JSON body
    ///
    /// # Errors
    ///
    /// Returns the transport error if no response was received.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        headers: &[(&str, &str)],
    ) -> Result<Response, reqwest::Error> {
        tracing::debug!(%url, "POST");
        let mut request = self.client.post(url).json(body);
        for (key, value) in headers {
            request = request.header(*key, *value);
        }
        request.send().await
    }
}
