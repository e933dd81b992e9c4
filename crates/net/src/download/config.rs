//! Configuration structures for artifact transfers

use std::time::Duration;
use vsixget_config::NetworkConfig;

/// Configuration for artifact transfers
#[derive(Clone, Debug)]
pub struct TransferConfig {
    /// Retry configuration
    pub retry_config: RetryConfig,
    /// Timeout for individual chunks (default: 30s)
    pub chunk_timeout: Duration,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            retry_config: RetryConfig::default(),
            chunk_timeout: Duration::from_secs(30),
        }
    }
}

impl TransferConfig {
    #[must_use]
    pub fn from_network(network: &NetworkConfig) -> Self {
        Self {
            retry_config: RetryConfig::from_network(network),
            chunk_timeout: network.chunk_timeout(),
        }
    }
}

/// Retry configuration shared by catalog queries and transfers
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial backoff delay
    pub initial_delay: Duration,
    /// Maximum backoff delay
    pub max_delay: Duration,
    /// Backoff multiplier
    pub backoff_multiplier: f64,
    /// Jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn from_network(network: &NetworkConfig) -> Self {
        Self {
            max_retries: network.retries,
            initial_delay: network.retry_delay(),
            ..Self::default()
        }
    }

    /// No retries and no waiting; handy for tests
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}
