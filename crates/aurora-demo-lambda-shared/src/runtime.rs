//! Lambda runtime state built once at cold start.
//!
//! `main` owns the [`LambdaRuntime`] and lends it to every invocation; nothing
//! in here is mutated after initialisation.
//!
//! # Cold-Start Logging
//!
//! - `config_ms`: time to read and validate the environment
//! - `sdk_ms`: time to resolve region and credentials providers
//! - `total_init_ms`: total initialisation time

use std::time::Instant;

use aws_config::SdkConfig;
use tracing::{error, info};

use aurora_demo_lib::{DatabaseConfig, Dispatcher, Error as LibError, WarmupPolicy};

use crate::aws::{RdsClusterMetadata, RdsDataApi};
use crate::transport::TransportConfig;

/// Error during runtime initialization.
#[derive(Debug, Clone)]
pub struct InitError {
    pub message: String,
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lambda initialization failed: {}", self.message)
    }
}

impl std::error::Error for InitError {}

impl From<LibError> for InitError {
    fn from(err: LibError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Configuration and service clients shared by all invocations.
pub struct LambdaRuntime {
    config: DatabaseConfig,
    warmup: WarmupPolicy,
    transport: TransportConfig,
    data_api: RdsDataApi,
    metadata: RdsClusterMetadata,
}

impl LambdaRuntime {
    /// Read every setting from the environment and build the SDK clients.
    pub async fn from_env() -> Result<Self, InitError> {
        let total_start = Instant::now();

        let config_start = Instant::now();
        let (config, warmup, transport) = match settings_from_env() {
            Ok(settings) => settings,
            Err(err) => {
                error!(error = %err, "invalid Lambda configuration");
                return Err(err.into());
            }
        };
        let config_ms = config_start.elapsed().as_millis();

        let sdk_start = Instant::now();
        let sdk_config = transport.load_sdk_config().await;
        let sdk_ms = sdk_start.elapsed().as_millis();

        let runtime = Self::with_sdk_config(&sdk_config, config, warmup, transport);

        info!(
            total_init_ms = total_start.elapsed().as_millis(),
            config_ms = config_ms,
            sdk_ms = sdk_ms,
            region = ?sdk_config.region().map(|r| r.as_ref().to_string()),
            "Lambda runtime initialization complete"
        );
        Ok(runtime)
    }

    /// Build the runtime from already-resolved settings.
    pub fn with_sdk_config(
        sdk_config: &SdkConfig,
        config: DatabaseConfig,
        warmup: WarmupPolicy,
        transport: TransportConfig,
    ) -> Self {
        info!(
            resource_arn = %config.resource_arn,
            secret_arn = %config.secret_arn,
            cluster_id = %config.cluster_id,
            warmup_max_attempts = warmup.max_attempts,
            warmup_retry_delay_ms = warmup.retry_delay.as_millis(),
            sdk_max_attempts = transport.max_attempts,
            connect_timeout_ms = transport.connect_timeout.as_millis(),
            read_timeout_ms = transport.read_timeout.as_millis(),
            "configured Data API target"
        );

        Self {
            data_api: RdsDataApi::new(sdk_config, &config),
            metadata: RdsClusterMetadata::new(sdk_config),
            config,
            warmup,
            transport,
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn warmup_policy(&self) -> WarmupPolicy {
        self.warmup
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// A dispatcher borrowing this runtime's clients and configuration.
    pub fn dispatcher(&self) -> Dispatcher<'_, RdsDataApi, RdsClusterMetadata> {
        Dispatcher::new(&self.data_api, &self.metadata, &self.config)
            .with_warmup_policy(self.warmup)
    }
}

fn settings_from_env() -> Result<(DatabaseConfig, WarmupPolicy, TransportConfig), LibError> {
    Ok((
        DatabaseConfig::from_env()?,
        WarmupPolicy::from_env()?,
        TransportConfig::from_env()?,
    ))
}
