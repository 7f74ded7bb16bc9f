//! Identifiers and policies read once at process start.
//!
//! # Environment Variables
//!
//! - `DBCLUSTERARN`: Data API resource ARN (required)
//! - `SECRETARN`: Secrets Manager ARN holding the database credentials (required)
//! - `DBCLUSTERID`: cluster identifier for `DescribeDBClusters` (required)
//! - `WARMUP_MAX_ATTEMPTS`: warm-up attempt cap (default: 10)
//! - `WARMUP_RETRY_DELAY_MS`: pause between retryable attempts (default: 0)

use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

pub const ENV_RESOURCE_ARN: &str = "DBCLUSTERARN";
pub const ENV_SECRET_ARN: &str = "SECRETARN";
pub const ENV_CLUSTER_ID: &str = "DBCLUSTERID";
pub const ENV_WARMUP_MAX_ATTEMPTS: &str = "WARMUP_MAX_ATTEMPTS";
pub const ENV_WARMUP_RETRY_DELAY_MS: &str = "WARMUP_RETRY_DELAY_MS";

/// Where the dispatcher sends its statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// ARN of the Aurora cluster, used as the Data API resource.
    pub resource_arn: String,
    /// ARN of the secret holding the database credentials.
    pub secret_arn: String,
    /// Cluster identifier used for capacity checks.
    pub cluster_id: String,
}

impl DatabaseConfig {
    pub fn new(
        resource_arn: impl Into<String>,
        secret_arn: impl Into<String>,
        cluster_id: impl Into<String>,
    ) -> Self {
        Self {
            resource_arn: resource_arn.into(),
            secret_arn: secret_arn.into(),
            cluster_id: cluster_id.into(),
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            resource_arn: required(&lookup, ENV_RESOURCE_ARN)?,
            secret_arn: required(&lookup, ENV_SECRET_ARN)?,
            cluster_id: required(&lookup, ENV_CLUSTER_ID)?,
        })
    }
}

/// Bounds on the warm-up retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl WarmupPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let max_attempts =
            optional(&lookup, ENV_WARMUP_MAX_ATTEMPTS)?.unwrap_or(defaults.max_attempts);
        if max_attempts == 0 {
            return Err(Error::InvalidConfig {
                name: ENV_WARMUP_MAX_ATTEMPTS,
                value: "0".to_string(),
                reason: "at least one attempt is required".to_string(),
            });
        }
        let retry_delay = optional::<u64, _>(&lookup, ENV_WARMUP_RETRY_DELAY_MS)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.retry_delay);

        Ok(Self {
            max_attempts,
            retry_delay,
        })
    }
}

impl Default for WarmupPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::ZERO,
        }
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingConfig { name }),
    }
}

/// Parse an optional numeric variable; empty values count as unset.
pub fn optional<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse()
                .map(Some)
                .map_err(|e: T::Err| Error::InvalidConfig {
                    name,
                    value,
                    reason: e.to_string(),
                })
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_all_identifiers() {
        let config = DatabaseConfig::from_lookup(lookup(&[
            ("DBCLUSTERARN", "arn:aws:rds:eu-west-1:1:cluster:demo"),
            ("SECRETARN", "arn:aws:secretsmanager:eu-west-1:1:secret:demo"),
            ("DBCLUSTERID", "demo"),
        ]))
        .unwrap();
        assert_eq!(config.cluster_id, "demo");
        assert!(config.resource_arn.ends_with("cluster:demo"));
    }

    #[test]
    fn missing_identifier_is_named() {
        let err = DatabaseConfig::from_lookup(lookup(&[
            ("DBCLUSTERARN", "arn"),
            ("SECRETARN", "  "),
            ("DBCLUSTERID", "demo"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::MissingConfig { name: "SECRETARN" }));
    }

    #[test]
    fn warmup_defaults() {
        let policy = WarmupPolicy::from_lookup(lookup(&[])).unwrap();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.retry_delay, Duration::ZERO);
    }

    #[test]
    fn warmup_overrides() {
        let policy = WarmupPolicy::from_lookup(lookup(&[
            ("WARMUP_MAX_ATTEMPTS", "3"),
            ("WARMUP_RETRY_DELAY_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.retry_delay, Duration::from_millis(250));
    }

    #[test]
    fn warmup_rejects_garbage_and_zero() {
        let err = WarmupPolicy::from_lookup(lookup(&[("WARMUP_MAX_ATTEMPTS", "ten")]))
            .unwrap_err();
        assert!(err.to_string().contains("WARMUP_MAX_ATTEMPTS"));

        let err =
            WarmupPolicy::from_lookup(lookup(&[("WARMUP_MAX_ATTEMPTS", "0")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }
}
