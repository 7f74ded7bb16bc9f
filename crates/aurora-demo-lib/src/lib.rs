//! Core library for the Aurora Serverless demo dispatcher.
//!
//! The [`Dispatcher`] maps an [`Action`] to calls against two service seams:
//!
//! - [`DataApi`]: SQL execution through the RDS Data API
//! - [`ClusterMetadata`]: cluster capacity through `DescribeDBClusters`
//!
//! and renders every outcome, failures included, as an HTML [`Page`].
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides scripted doubles for both seams. Enable
//! the `test-utils` feature to access it from dependent crates.

pub mod action;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod render;
pub mod schema;
pub mod statement;
pub mod transaction;
pub mod warmup;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use action::{Action, ActionRequest};
pub use client::{ClusterDescription, ClusterMetadata, ClusterStatus, DataApi, ServerState};
pub use config::{DatabaseConfig, WarmupPolicy};
pub use dispatch::Dispatcher;
pub use error::{Error, Result, ServiceError, ServiceErrorKind, LINK_FAILURE_PREFIX};
pub use render::{Page, CONTENT_TYPE_HTML, PAGE_STATUS};
pub use statement::{
    ArrayValue, BatchResult, BatchStatement, ColumnMetadata, CommitResult, ExecuteResult,
    RollbackResult, SqlParameter, SqlValue, Statement, TransactionHandle, UpdateResult,
};
pub use transaction::Transaction;
pub use warmup::{warm_up, RetryState, WarmupOutcome, WarmupReport};
