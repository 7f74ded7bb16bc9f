//! Scripted service doubles for dispatcher tests.
//!
//! Each double answers from a queue of scripted results and records every
//! call, so tests can assert both on the rendered page and on the exact
//! sequence of service calls. When a queue runs dry the double answers with a
//! neutral success.
//!
//! # Usage
//!
//! ```ignore
//! use aurora_demo_lib::test_utils::{fixture_config, ScriptedClusterMetadata, ScriptedDataApi};
//!
//! let data = ScriptedDataApi::new().with_execute(Err(ServiceError::link_failure("")));
//! let metadata = ScriptedClusterMetadata::with_capacity(2);
//! let config = fixture_config();
//! let dispatcher = Dispatcher::new(&data, &metadata, &config);
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::client::{ClusterDescription, ClusterMetadata, DataApi};
use crate::config::DatabaseConfig;
use crate::error::{ServiceError, ServiceErrorKind};
use crate::statement::{
    BatchResult, BatchStatement, CommitResult, ExecuteResult, RollbackResult, SqlValue, Statement,
    TransactionHandle, UpdateResult,
};

/// Transaction identifier handed out by [`ScriptedDataApi`] unless scripted otherwise.
pub const FIXTURE_TRANSACTION_ID: &str = "tx-fixture-0001";

/// A Data API call as observed by [`ScriptedDataApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum DataApiCall {
    Execute(Statement),
    Batch(BatchStatement),
    Begin { database: String },
    Commit { transaction_id: String },
    Rollback { transaction_id: String },
}

/// Scripted [`DataApi`].
#[derive(Default)]
pub struct ScriptedDataApi {
    execute: Mutex<VecDeque<Result<ExecuteResult, ServiceError>>>,
    batch: Mutex<VecDeque<Result<BatchResult, ServiceError>>>,
    begin: Mutex<VecDeque<Result<TransactionHandle, ServiceError>>>,
    commit: Mutex<VecDeque<Result<CommitResult, ServiceError>>>,
    rollback: Mutex<VecDeque<Result<RollbackResult, ServiceError>>>,
    calls: Mutex<Vec<DataApiCall>>,
}

impl ScriptedDataApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next unanswered `ExecuteStatement`.
    pub fn with_execute(self, result: Result<ExecuteResult, ServiceError>) -> Self {
        lock(&self.execute).push_back(result);
        self
    }

    /// Queue the same `ExecuteStatement` outcome `times` times.
    pub fn with_execute_repeated(
        self,
        result: Result<ExecuteResult, ServiceError>,
        times: usize,
    ) -> Self {
        {
            let mut queue = lock(&self.execute);
            for _ in 0..times {
                queue.push_back(result.clone());
            }
        }
        self
    }

    pub fn with_batch(self, result: Result<BatchResult, ServiceError>) -> Self {
        lock(&self.batch).push_back(result);
        self
    }

    pub fn with_begin(self, result: Result<TransactionHandle, ServiceError>) -> Self {
        lock(&self.begin).push_back(result);
        self
    }

    pub fn with_commit(self, result: Result<CommitResult, ServiceError>) -> Self {
        lock(&self.commit).push_back(result);
        self
    }

    pub fn with_rollback(self, result: Result<RollbackResult, ServiceError>) -> Self {
        lock(&self.rollback).push_back(result);
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<DataApiCall> {
        lock(&self.calls).clone()
    }

    /// Statements passed to `ExecuteStatement`, in order.
    pub fn executed(&self) -> Vec<Statement> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                DataApiCall::Execute(statement) => Some(statement.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn execute_count(&self) -> usize {
        self.executed().len()
    }

    fn record(&self, call: DataApiCall) {
        lock(&self.calls).push(call);
    }
}

impl DataApi for ScriptedDataApi {
    async fn execute_statement(
        &self,
        statement: &Statement,
    ) -> Result<ExecuteResult, ServiceError> {
        self.record(DataApiCall::Execute(statement.clone()));
        lock(&self.execute)
            .pop_front()
            .unwrap_or_else(|| Ok(ExecuteResult::default()))
    }

    async fn batch_execute_statement(
        &self,
        batch: &BatchStatement,
    ) -> Result<BatchResult, ServiceError> {
        self.record(DataApiCall::Batch(batch.clone()));
        lock(&self.batch).pop_front().unwrap_or_else(|| {
            Ok(BatchResult {
                update_results: vec![UpdateResult::default(); batch.parameter_sets.len()],
            })
        })
    }

    async fn begin_transaction(&self, database: &str) -> Result<TransactionHandle, ServiceError> {
        self.record(DataApiCall::Begin {
            database: database.to_string(),
        });
        lock(&self.begin).pop_front().unwrap_or_else(|| {
            Ok(TransactionHandle {
                transaction_id: FIXTURE_TRANSACTION_ID.to_string(),
            })
        })
    }

    async fn commit_transaction(
        &self,
        handle: &TransactionHandle,
    ) -> Result<CommitResult, ServiceError> {
        self.record(DataApiCall::Commit {
            transaction_id: handle.transaction_id.clone(),
        });
        lock(&self.commit).pop_front().unwrap_or_else(|| {
            Ok(CommitResult {
                transaction_status: Some("Transaction Committed".to_string()),
            })
        })
    }

    async fn rollback_transaction(
        &self,
        handle: &TransactionHandle,
    ) -> Result<RollbackResult, ServiceError> {
        self.record(DataApiCall::Rollback {
            transaction_id: handle.transaction_id.clone(),
        });
        lock(&self.rollback).pop_front().unwrap_or_else(|| {
            Ok(RollbackResult {
                transaction_status: Some("Rollback Complete".to_string()),
            })
        })
    }
}

/// Scripted [`ClusterMetadata`].
pub struct ScriptedClusterMetadata {
    responses: Mutex<VecDeque<Result<Option<ClusterDescription>, ServiceError>>>,
    fallback_capacity: i32,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClusterMetadata {
    /// Always describe one cluster with `capacity` unless scripted otherwise.
    pub fn with_capacity(capacity: i32) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback_capacity: capacity,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(self, response: Result<Option<ClusterDescription>, ServiceError>) -> Self {
        lock(&self.responses).push_back(response);
        self
    }

    /// Cluster identifiers passed to `DescribeDBClusters`, in order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn describe_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

impl ClusterMetadata for ScriptedClusterMetadata {
    async fn describe_cluster(
        &self,
        cluster_id: &str,
    ) -> Result<Option<ClusterDescription>, ServiceError> {
        lock(&self.calls).push(cluster_id.to_string());
        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Ok(Some(ClusterDescription {
                capacity: Some(self.fallback_capacity),
                status: Some("available".to_string()),
            }))
        })
    }
}

/// Configuration with fake but well-formed identifiers.
pub fn fixture_config() -> DatabaseConfig {
    DatabaseConfig::new(
        "arn:aws:rds:eu-west-1:123456789012:cluster:demo-cluster",
        "arn:aws:secretsmanager:eu-west-1:123456789012:secret:demo-secret",
        "demo-cluster",
    )
}

/// The error a resuming cluster returns.
pub fn link_failure() -> ServiceError {
    ServiceError::link_failure(
        "\n\nThe last packet sent successfully to the server was 0 milliseconds ago.",
    )
}

/// A non-retryable SQL error.
pub fn syntax_error() -> ServiceError {
    ServiceError::new(
        ServiceErrorKind::BadRequest,
        "Database error code: 1064. Message: You have an error in your SQL syntax",
    )
}

/// An insert result carrying one generated key.
pub fn inserted_with_id(id: i64) -> ExecuteResult {
    ExecuteResult {
        number_of_records_updated: 1,
        generated_fields: Some(vec![SqlValue::LongValue(id)]),
        ..ExecuteResult::default()
    }
}

/// Create a mock request ID for testing.
pub fn mock_request_id(suffix: &str) -> String {
    format!("test-request-{}", suffix)
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
