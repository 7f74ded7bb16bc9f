use std::fmt;

use thiserror::Error;

/// Convenient result alias for the dispatcher library.
pub type Result<T> = std::result::Result<T, Error>;

/// Message prefix the Data API uses while a paused cluster is still resuming.
pub const LINK_FAILURE_PREFIX: &str = "Communications link failure";

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when the Data API or the RDS control plane rejects a call.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Raised when a required configuration value is absent.
    #[error("missing required configuration value {name}")]
    MissingConfig { name: &'static str },

    /// Raised when a configuration value cannot be parsed.
    #[error("invalid value for {name}: {value:?} ({reason})")]
    InvalidConfig {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// Raised when `DescribeDBClusters` returns no cluster for the identifier.
    #[error("cluster {cluster_id} was not found")]
    ClusterNotFound { cluster_id: String },

    /// Raised when the described cluster does not report a capacity.
    #[error("cluster {cluster_id} did not report a capacity")]
    CapacityUnavailable { cluster_id: String },

    /// Raised when `BeginTransaction` succeeds without returning an identifier.
    #[error("begin transaction returned no transaction id")]
    MissingTransactionId,

    /// Raised when an insert inside a transaction produced no generated key.
    #[error("statement returned no generated numeric id")]
    MissingGeneratedId,

    /// Raised when a result cannot be rendered as JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Classification carried by every service failure.
///
/// Mirrors the exception names the Data API and RDS control plane report,
/// plus [`ServiceErrorKind::Transport`] for failures that never reached the
/// service (timeouts, DNS, connection resets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceErrorKind {
    BadRequest,
    Forbidden,
    NotFound,
    ServiceUnavailable,
    StatementTimeout,
    Internal,
    Transport,
    Other(String),
}

impl ServiceErrorKind {
    /// Map a service error code (e.g. `BadRequestException`) to a kind.
    pub fn from_code(code: &str) -> Self {
        match code {
            "BadRequestException" => Self::BadRequest,
            "ForbiddenException" | "AccessDeniedException" => Self::Forbidden,
            "NotFoundException" | "DBClusterNotFoundFault" => Self::NotFound,
            "ServiceUnavailableError" | "ServiceUnavailableException" => Self::ServiceUnavailable,
            "StatementTimeoutException" => Self::StatementTimeout,
            "InternalServerErrorException" => Self::Internal,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest => f.write_str("BadRequestException"),
            Self::Forbidden => f.write_str("ForbiddenException"),
            Self::NotFound => f.write_str("NotFoundException"),
            Self::ServiceUnavailable => f.write_str("ServiceUnavailableError"),
            Self::StatementTimeout => f.write_str("StatementTimeoutException"),
            Self::Internal => f.write_str("InternalServerErrorException"),
            Self::Transport => f.write_str("TransportError"),
            Self::Other(code) => f.write_str(code),
        }
    }
}

/// A failure reported by the Data API or the cluster metadata service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for the failure a resuming cluster reports.
    pub fn link_failure(detail: &str) -> Self {
        Self::new(
            ServiceErrorKind::BadRequest,
            format!("{LINK_FAILURE_PREFIX}{detail}"),
        )
    }

    /// True when the cluster endpoint was momentarily unreachable.
    ///
    /// Only a bad request whose message starts with the link-failure prefix
    /// qualifies; any other bad request (bad SQL, constraint violations) does
    /// not.
    pub fn is_transient_link_failure(&self) -> bool {
        self.kind == ServiceErrorKind::BadRequest && self.message.starts_with(LINK_FAILURE_PREFIX)
    }
}
