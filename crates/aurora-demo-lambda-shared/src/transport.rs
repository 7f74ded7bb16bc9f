//! SDK transport settings, built once at cold start.
//!
//! These govern the SDK's own retries and socket timeouts and are independent
//! of the application-level warm-up loop.
//!
//! # Environment Variables
//!
//! - `AWS_MAX_ATTEMPTS`: SDK attempts per call, first try included (default: 10)
//! - `AWS_CONNECT_TIMEOUT_MS`: connect timeout (default: 60000)
//! - `AWS_READ_TIMEOUT_MS`: read timeout (default: 60000)

use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, SdkConfig};

use aurora_demo_lib::config::optional;
use aurora_demo_lib::{Error, Result};

pub const ENV_MAX_ATTEMPTS: &str = "AWS_MAX_ATTEMPTS";
pub const ENV_CONNECT_TIMEOUT_MS: &str = "AWS_CONNECT_TIMEOUT_MS";
pub const ENV_READ_TIMEOUT_MS: &str = "AWS_READ_TIMEOUT_MS";

/// Retry and timeout settings handed to the SDK config loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    pub max_attempts: u32,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            connect_timeout: Duration::from_secs(60),
            read_timeout: Duration::from_secs(60),
        }
    }
}

impl TransportConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let max_attempts = optional(&lookup, ENV_MAX_ATTEMPTS)?.unwrap_or(defaults.max_attempts);
        if max_attempts == 0 {
            return Err(Error::InvalidConfig {
                name: ENV_MAX_ATTEMPTS,
                value: "0".to_string(),
                reason: "at least one attempt is required".to_string(),
            });
        }

        Ok(Self {
            max_attempts,
            connect_timeout: optional(&lookup, ENV_CONNECT_TIMEOUT_MS)?
                .map(Duration::from_millis)
                .unwrap_or(defaults.connect_timeout),
            read_timeout: optional(&lookup, ENV_READ_TIMEOUT_MS)?
                .map(Duration::from_millis)
                .unwrap_or(defaults.read_timeout),
        })
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::standard().with_max_attempts(self.max_attempts)
    }

    pub fn timeout_config(&self) -> TimeoutConfig {
        TimeoutConfig::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .build()
    }

    /// Load region and credentials from the environment with these settings applied.
    pub async fn load_sdk_config(&self) -> SdkConfig {
        aws_config::defaults(BehaviorVersion::latest())
            .retry_config(self.retry_config())
            .timeout_config(self.timeout_config())
            .load()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_lambda_settings() {
        let config = TransportConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, TransportConfig::default());
        assert_eq!(config.max_attempts, 10);
        assert_eq!(config.read_timeout, Duration::from_secs(60));
    }

    #[test]
    fn overrides_are_read_in_millis() {
        let config = TransportConfig::from_lookup(|name| match name {
            "AWS_MAX_ATTEMPTS" => Some("3".to_string()),
            "AWS_CONNECT_TIMEOUT_MS" => Some("1500".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.connect_timeout, Duration::from_millis(1500));
        assert_eq!(config.read_timeout, Duration::from_secs(60));
        assert_eq!(config.retry_config().max_attempts(), 3);
    }

    #[test]
    fn malformed_values_fail() {
        let err = TransportConfig::from_lookup(|name| {
            (name == "AWS_READ_TIMEOUT_MS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("AWS_READ_TIMEOUT_MS"));
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let err = TransportConfig::from_lookup(|name| {
            (name == "AWS_MAX_ATTEMPTS").then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig {
                name: "AWS_MAX_ATTEMPTS",
                ..
            }
        ));
    }
}
