//! Warm-up of a paused Aurora Serverless cluster.
//!
//! A paused cluster answers the first statements with a `BadRequestException`
//! whose message starts with `Communications link failure` while it resumes.
//! The loop below re-issues `select 1` on exactly that failure, up to
//! [`WarmupPolicy::max_attempts`] attempts:
//!
//! ```text
//! ATTEMPT --ok---------------------------> SUCCESS
//! ATTEMPT --link failure-----------------> RETRYABLE_FAILURE
//! ATTEMPT --any other error--------------> FATAL_FAILURE (propagates)
//! RETRYABLE_FAILURE --attempt < max------> ATTEMPT
//! RETRYABLE_FAILURE --attempt >= max-----> EXHAUSTED
//! ```
//!
//! Every retryable failure also triggers one `DescribeDBClusters` call whose
//! capacity is only logged.

use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::client::{ClusterMetadata, DataApi};
use crate::config::WarmupPolicy;
use crate::error::{Result, ServiceError};
use crate::schema::WARMUP_SQL;
use crate::statement::{ExecuteResult, Statement};

/// Attempt bookkeeping for one warm-up call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    max_attempts: u32,
    should_retry: bool,
}

impl RetryState {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempt: 1,
            max_attempts,
            should_retry: false,
        }
    }

    /// The 1-based number of the attempt in flight.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn should_retry(&self) -> bool {
        self.should_retry
    }

    /// Record a retryable failure and move to the next attempt.
    ///
    /// Returns `false` once the cap is reached; the attempt counter then
    /// stays at the last attempt performed.
    pub fn advance(&mut self) -> bool {
        self.should_retry = true;
        if self.attempt < self.max_attempts {
            self.attempt += 1;
            true
        } else {
            false
        }
    }
}

/// How the warm-up loop ended, short of a fatal error.
#[derive(Debug, Clone, PartialEq)]
pub enum WarmupOutcome {
    /// The cluster answered `select 1`.
    Ready(ExecuteResult),
    /// Every attempt hit a link failure; holds the last one.
    Exhausted(ServiceError),
}

/// Result of a warm-up together with its diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct WarmupReport {
    pub outcome: WarmupOutcome,
    /// Number of `select 1` executions performed.
    pub attempts: u32,
    /// Wall time of the whole loop, including diagnostic calls.
    pub elapsed: Duration,
}

impl WarmupReport {
    pub fn is_ready(&self) -> bool {
        matches!(self.outcome, WarmupOutcome::Ready(_))
    }
}

/// Run the warm-up loop against `data`, describing `cluster_id` on each
/// retryable failure.
///
/// Errors other than a transient link failure are returned immediately
/// without a further attempt.
pub async fn warm_up<D, M>(
    data: &D,
    metadata: &M,
    cluster_id: &str,
    policy: &WarmupPolicy,
) -> Result<WarmupReport>
where
    D: DataApi,
    M: ClusterMetadata,
{
    let started = Instant::now();
    let statement = Statement::new(WARMUP_SQL);
    let mut state = RetryState::new(policy.max_attempts);

    let outcome = loop {
        debug!(attempt = state.attempt(), "executing warm-up statement");
        let attempt_start = Instant::now();
        let result = data.execute_statement(&statement).await;
        let query_ms = attempt_start.elapsed().as_millis();

        match result {
            Ok(result) => {
                info!(
                    attempt = state.attempt(),
                    query_ms = query_ms,
                    "warm-up statement succeeded"
                );
                break WarmupOutcome::Ready(result);
            }
            Err(err) if err.is_transient_link_failure() => {
                warn!(
                    attempt = state.attempt(),
                    query_ms = query_ms,
                    error = %err,
                    "cluster not reachable yet"
                );
                log_capacity(metadata, cluster_id).await;

                if !state.advance() {
                    break WarmupOutcome::Exhausted(err);
                }
                if !policy.retry_delay.is_zero() {
                    tokio::time::sleep(policy.retry_delay).await;
                }
            }
            Err(err) => {
                error!(
                    attempt = state.attempt(),
                    query_ms = query_ms,
                    error = %err,
                    "warm-up statement failed"
                );
                return Err(err.into());
            }
        }
    };

    let elapsed = started.elapsed();
    info!(
        attempts = state.attempt(),
        retried = state.should_retry(),
        total_ms = elapsed.as_millis(),
        ready = matches!(outcome, WarmupOutcome::Ready(_)),
        "warm-up finished"
    );

    Ok(WarmupReport {
        outcome,
        attempts: state.attempt(),
        elapsed,
    })
}

async fn log_capacity<M: ClusterMetadata>(metadata: &M, cluster_id: &str) {
    match metadata.describe_cluster(cluster_id).await {
        Ok(Some(cluster)) => info!(
            cluster_id = %cluster_id,
            capacity = ?cluster.capacity,
            status = ?cluster.status,
            "current cluster capacity"
        ),
        Ok(None) => warn!(cluster_id = %cluster_id, "cluster not found while warming up"),
        Err(err) => warn!(
            cluster_id = %cluster_id,
            error = %err,
            "cluster describe failed while warming up"
        ),
    }
}
