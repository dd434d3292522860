//! Client configuration.
//!
//! A profile can be built in code or read from TOML:
//!
//! ```toml
//! version = "v1"
//! region = "EU"
//!
//! [retry.build]
//! interval_ms = 10000
//! max_attempts = 30
//! ```

use serde::Deserialize;
use std::{fs, path::Path, time::Duration};
use thiserror::Error;

use crate::version::{ApiVersion, Region};

pub const TOKEN_URL: &str = "https://api.amazon.com/auth/o2/token";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("[E120] Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("[E121] Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Fixed-interval retry budget.
///
/// `max_attempts` counts every call, including the first one.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct RetryPolicy {
    #[serde(rename = "interval_ms", with = "millis")]
    pub interval: Duration,
    pub max_attempts: usize,
}

impl RetryPolicy {
    pub const fn new(interval: Duration, max_attempts: usize) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Number of calls after the first one.
    pub const fn retries(&self) -> usize {
        self.max_attempts.saturating_sub(1)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct RetrySettings {
    /// Build and validation status polling.
    pub build: RetryPolicy,
    /// Backoff after a 429 response.
    pub rate_limit: RetryPolicy,
    /// Slow, irreversible operations such as certification withdrawal.
    pub long_wait: RetryPolicy,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            build: RetryPolicy::new(Duration::from_secs(10), 30),
            rate_limit: RetryPolicy::new(Duration::from_secs(1), 10),
            long_wait: RetryPolicy::new(Duration::from_secs(60), 10),
        }
    }
}

impl RetrySettings {
    /// Same budgets, every interval replaced by `interval`.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.build.interval = interval;
        self.rate_limit.interval = interval;
        self.long_wait.interval = interval;
        self
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Version selector (`v0`, `v1`); anything else means the newest.
    pub version: Option<String>,
    /// Region code (`NA`, `EU`, `FE`); anything else means `NA`.
    pub region: Option<String>,
    /// Overrides the region base URL.
    pub base_url: Option<String>,
    pub token_url: String,
    pub access_token: Option<String>,
    pub retry: RetrySettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: None,
            region: None,
            base_url: None,
            token_url: TOKEN_URL.to_owned(),
            access_token: None,
            retry: RetrySettings::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(version: Option<&str>, region: Option<&str>) -> Self {
        Self {
            version: version.map(str::to_owned),
            region: region.map(str::to_owned),
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// Fails if the document is not valid TOML or has mistyped fields.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    pub fn api_version(&self) -> ApiVersion {
        ApiVersion::from_selector(self.version.as_deref())
    }

    pub fn api_region(&self) -> Region {
        Region::from_code(self.region.as_deref())
    }

    /// Explicit override when present, otherwise the region's base URL.
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.api_region().base_url())
    }
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
