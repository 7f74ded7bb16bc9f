//! Shared infrastructure for the Aurora demo Lambda function and CLI.
//!
//! This crate provides the AWS-facing half of the dispatcher:
//!
//! - [`RdsDataApi`] / [`RdsClusterMetadata`]: AWS SDK implementations of the service seams
//! - [`TransportConfig`]: SDK retry and timeout settings, built once at start
//! - [`LambdaRuntime`]: configuration and clients shared by all invocations
//! - [`init_tracing`]: JSON-formatted tracing for CloudWatch Logs
//! - [`DispatchRequest`] / [`HtmlResponse`]: proxy integration event and response shapes

mod aws;
mod requests;
mod response;
mod runtime;
mod tracing_init;
mod transport;

pub use aws::{service_error, RdsClusterMetadata, RdsDataApi};
pub use requests::{DispatchRequest, ACTION_PARAMETER};
pub use response::HtmlResponse;
pub use runtime::{InitError, LambdaRuntime};
pub use tracing_init::{init_tracing, init_tracing_with, LogFormat};
pub use transport::TransportConfig;
