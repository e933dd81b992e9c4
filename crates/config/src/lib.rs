#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for vsixget
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/vsixget/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use vsixget_errors::{ConfigError, Error};
use vsixget_types::ColorChoice;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub color: ColorChoice,
}

/// Download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_download_dir")]
    pub dir: PathBuf,
    /// Reuse finished files and resume partial ones
    #[serde(default = "default_cached")]
    pub cached: bool,
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
    #[serde(default = "default_chunk_timeout")]
    pub chunk_timeout: u64, // seconds
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

/// Catalog endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_gallery_url")]
    pub gallery_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

// Default implementations

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: default_download_dir(),
            cached: true,
            jobs: constants::DEFAULT_JOBS,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: 300, // 5 minutes
            connect_timeout: 30,
            chunk_timeout: 30,
            retries: 3,
            retry_delay_ms: 500,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            gallery_url: default_gallery_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl NetworkConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    #[must_use]
    pub fn chunk_timeout(&self) -> Duration {
        Duration::from_secs(self.chunk_timeout)
    }

    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

// Default value functions for serde
fn default_download_dir() -> PathBuf {
    PathBuf::from(constants::DEFAULT_DOWNLOAD_DIR)
}

fn default_cached() -> bool {
    true
}

fn default_jobs() -> usize {
    constants::DEFAULT_JOBS
}

fn default_timeout() -> u64 {
    300 // 5 minutes
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_chunk_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_gallery_url() -> String {
    constants::DEFAULT_GALLERY_URL.to_string()
}

fn default_user_agent() -> String {
    constants::DEFAULT_USER_AGENT.to_string()
}

/// Interpret a loosely-typed boolean flag value
///
/// `true 1 t y yes yeah yup certainly` (any case) are true; everything else
/// is false.
#[must_use]
pub fn parse_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "t" | "y" | "yes" | "yeah" | "yup" | "certainly"
    )
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir
            .join(constants::CONFIG_DIR_NAME)
            .join(constants::CONFIG_FILE_NAME))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        tracing::debug!(path = %path.display(), "loading config file");

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let Ok(config_path) = Self::default_path() else {
            return Ok(Self::default());
        };

        if fs::try_exists(&config_path).await.unwrap_or(false) {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// An explicit path must exist; the default path may be absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // VSIXGET_DOWNLOAD_DIR
        if let Ok(dir) = std::env::var("VSIXGET_DOWNLOAD_DIR") {
            if dir.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "VSIXGET_DOWNLOAD_DIR".to_string(),
                    value: dir,
                }
                .into());
            }
            self.download.dir = PathBuf::from(dir);
        }

        // VSIXGET_CACHED
        if let Ok(cached) = std::env::var("VSIXGET_CACHED") {
            self.download.cached = parse_truthy(&cached);
        }

        // VSIXGET_JOBS
        if let Ok(jobs) = std::env::var("VSIXGET_JOBS") {
            self.download.jobs = jobs.parse().map_err(|_| ConfigError::InvalidValue {
                field: "VSIXGET_JOBS".to_string(),
                value: jobs,
            })?;
        }

        // VSIXGET_TIMEOUT
        if let Ok(timeout) = std::env::var("VSIXGET_TIMEOUT") {
            self.network.timeout = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: "VSIXGET_TIMEOUT".to_string(),
                value: timeout,
            })?;
        }

        // VSIXGET_GALLERY_URL
        if let Ok(url) = std::env::var("VSIXGET_GALLERY_URL") {
            self.catalog.gallery_url = url;
        }

        Ok(())
    }

    /// Reject values no layer may produce
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.download.jobs == 0 || self.download.jobs > constants::MAX_JOBS {
            return Err(ConfigError::InvalidValue {
                field: "download.jobs".to_string(),
                value: self.download.jobs.to_string(),
            }
            .into());
        }
        for (field, value) in [
            ("network.timeout", self.network.timeout),
            ("network.connect_timeout", self.network.connect_timeout),
            ("network.chunk_timeout", self.network.chunk_timeout),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: "0".to_string(),
                }
                .into());
            }
        }
        if !(self.catalog.gallery_url.starts_with("http://")
            || self.catalog.gallery_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue {
                field: "catalog.gallery_url".to_string(),
                value: self.catalog.gallery_url.clone(),
            }
            .into());
        }
        Ok(())
    }
}
