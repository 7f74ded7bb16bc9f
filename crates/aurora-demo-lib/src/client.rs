//! Service seams for the Data API and the RDS control plane.
//!
//! The dispatcher only talks to these traits. The Lambda crate provides the
//! AWS SDK implementations; tests use the scripted mocks in
//! [`crate::test_utils`].

use std::fmt;
use std::future::Future;

use crate::error::ServiceError;
use crate::statement::{
    BatchResult, BatchStatement, CommitResult, ExecuteResult, RollbackResult, Statement,
    TransactionHandle,
};

/// SQL execution through the RDS Data API.
pub trait DataApi: Send + Sync {
    fn execute_statement(
        &self,
        statement: &Statement,
    ) -> impl Future<Output = Result<ExecuteResult, ServiceError>> + Send;

    fn batch_execute_statement(
        &self,
        batch: &BatchStatement,
    ) -> impl Future<Output = Result<BatchResult, ServiceError>> + Send;

    fn begin_transaction(
        &self,
        database: &str,
    ) -> impl Future<Output = Result<TransactionHandle, ServiceError>> + Send;

    fn commit_transaction(
        &self,
        handle: &TransactionHandle,
    ) -> impl Future<Output = Result<CommitResult, ServiceError>> + Send;

    fn rollback_transaction(
        &self,
        handle: &TransactionHandle,
    ) -> impl Future<Output = Result<RollbackResult, ServiceError>> + Send;
}

/// Cluster description through `DescribeDBClusters`.
pub trait ClusterMetadata: Send + Sync {
    /// Describe the cluster, returning `Ok(None)` when no cluster matched.
    fn describe_cluster(
        &self,
        cluster_id: &str,
    ) -> impl Future<Output = Result<Option<ClusterDescription>, ServiceError>> + Send;
}

/// The subset of a cluster description the dispatcher reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClusterDescription {
    /// Current Aurora capacity units; absent while the cluster is being modified.
    pub capacity: Option<i32>,
    pub status: Option<String>,
}

/// Whether a serverless cluster is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Up,
    Down,
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerState::Up => f.write_str("UP"),
            ServerState::Down => f.write_str("DOWN"),
        }
    }
}

/// Capacity of a described cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterStatus {
    pub capacity: u32,
}

impl ClusterStatus {
    /// A paused serverless cluster reports zero capacity.
    pub fn state(&self) -> ServerState {
        if self.capacity > 0 {
            ServerState::Up
        } else {
            ServerState::Down
        }
    }
}
