use crate::constants::{
    DEFAULT_EXPECTED_STATUS, DEFAULT_IMPLEMENTATION, DEFAULT_POOL_SIZE, DEFAULT_TIMEOUT,
};
use crate::error::ConfigError;
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

/// Settings for a single benchmark run.
///
/// The target URL and request count are checked on construction. The remaining settings are
/// builder-style and checked by [`BenchConfig::validate`], which the dispatcher calls before
/// sending anything.
///
/// # Example
/// ```
/// use barrage::BenchConfig;
/// use std::time::Duration;
///
/// let config = BenchConfig::new("http://127.0.0.1:3002/status/200", 100)
///     .unwrap()
///     .expected_status(200)
///     .timeout(Duration::from_secs(2))
///     .pool_size(10);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct BenchConfig {
    target: Url,
    requests: usize,
    expected_status: u16,
    timeout: Duration,
    pool_size: usize,
    implementation: String,
}

impl BenchConfig {
    pub fn new(target: &str, requests: usize) -> Result<Self, ConfigError> {
        let target = parse_target(target)?;
        if requests == 0 {
            return Err(ConfigError::ZeroRequests);
        }

        Ok(Self {
            target,
            requests,
            expected_status: DEFAULT_EXPECTED_STATUS,
            timeout: DEFAULT_TIMEOUT,
            pool_size: DEFAULT_POOL_SIZE,
            implementation: DEFAULT_IMPLEMENTATION.to_string(),
        })
    }

    pub fn expected_status(mut self, status: u16) -> Self {
        self.expected_status = status;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn implementation(mut self, tag: &str) -> Self {
        self.implementation = tag.to_string();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.status()?;
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        Ok(())
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    pub fn requests(&self) -> usize {
        self.requests
    }

    pub fn timeout_duration(&self) -> Duration {
        self.timeout
    }

    /// Connections allowed per host, both in flight and idle in the pool.
    pub fn pool_size_limit(&self) -> usize {
        self.pool_size
    }

    pub fn implementation_tag(&self) -> &str {
        &self.implementation
    }

    pub(crate) fn status(&self) -> Result<StatusCode, ConfigError> {
        StatusCode::from_u16(self.expected_status)
            .map_err(|_| ConfigError::InvalidStatus(self.expected_status))
    }
}

pub(crate) fn parse_target(target: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(target)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}
