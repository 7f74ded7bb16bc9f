//! AWS SDK implementations of the dispatcher's service seams.
//!
//! [`RdsDataApi`] binds the configured resource and secret ARNs to every Data
//! API call; [`RdsClusterMetadata`] wraps `DescribeDBClusters`. SDK errors are
//! reduced to a [`ServiceError`] whose kind comes from the service error code,
//! or [`ServiceErrorKind::Transport`] when the request never got an answer.

use std::error::Error as StdError;
use std::fmt::Debug;

use aws_config::SdkConfig;
use aws_sdk_rdsdata::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_rdsdata::primitives::Blob;
use aws_sdk_rdsdata::types::{
    ArrayValue as SdkArrayValue, ColumnMetadata as SdkColumnMetadata, Field,
    SqlParameter as SdkSqlParameter,
};
use tracing::{debug, warn};

use aurora_demo_lib::{
    ArrayValue, BatchResult, BatchStatement, ClusterDescription, ClusterMetadata, ColumnMetadata,
    CommitResult, DataApi, DatabaseConfig, ExecuteResult, RollbackResult, ServiceError,
    ServiceErrorKind, SqlParameter, SqlValue, Statement, TransactionHandle, UpdateResult,
};

/// The RDS Data API, bound to one cluster and one credentials secret.
#[derive(Debug, Clone)]
pub struct RdsDataApi {
    client: aws_sdk_rdsdata::Client,
    resource_arn: String,
    secret_arn: String,
}

impl RdsDataApi {
    pub fn new(sdk_config: &SdkConfig, config: &DatabaseConfig) -> Self {
        Self::from_client(aws_sdk_rdsdata::Client::new(sdk_config), config)
    }

    pub fn from_client(client: aws_sdk_rdsdata::Client, config: &DatabaseConfig) -> Self {
        Self {
            client,
            resource_arn: config.resource_arn.clone(),
            secret_arn: config.secret_arn.clone(),
        }
    }
}

impl DataApi for RdsDataApi {
    async fn execute_statement(
        &self,
        statement: &Statement,
    ) -> Result<ExecuteResult, ServiceError> {
        debug!(
            sql = %statement.sql,
            parameters = statement.parameters.len(),
            database = ?statement.database,
            transaction_id = ?statement.transaction_id,
            "ExecuteStatement"
        );
        let output = self
            .client
            .execute_statement()
            .resource_arn(&self.resource_arn)
            .secret_arn(&self.secret_arn)
            .sql(&statement.sql)
            .set_parameters(to_sdk_parameters(&statement.parameters))
            .set_database(statement.database.clone())
            .set_transaction_id(statement.transaction_id.clone())
            .include_result_metadata(statement.include_result_metadata)
            .send()
            .await
            .map_err(service_error)?;

        Ok(ExecuteResult {
            number_of_records_updated: output.number_of_records_updated(),
            formatted_records: output.formatted_records().map(str::to_string),
            column_metadata: output
                .column_metadata
                .map(|columns| columns.iter().map(from_sdk_column).collect()),
            generated_fields: output
                .generated_fields
                .map(|fields| fields.into_iter().map(from_sdk_field).collect()),
            records: output.records.map(|rows| {
                rows.into_iter()
                    .map(|row| row.into_iter().map(from_sdk_field).collect())
                    .collect()
            }),
        })
    }

    async fn batch_execute_statement(
        &self,
        batch: &BatchStatement,
    ) -> Result<BatchResult, ServiceError> {
        debug!(
            sql = %batch.sql,
            parameter_sets = batch.parameter_sets.len(),
            "BatchExecuteStatement"
        );
        let parameter_sets = batch
            .parameter_sets
            .iter()
            .map(|set| set.iter().map(to_sdk_parameter).collect())
            .collect();

        let output = self
            .client
            .batch_execute_statement()
            .resource_arn(&self.resource_arn)
            .secret_arn(&self.secret_arn)
            .sql(&batch.sql)
            .set_database(batch.database.clone())
            .set_parameter_sets(Some(parameter_sets))
            .send()
            .await
            .map_err(service_error)?;

        Ok(BatchResult {
            update_results: output
                .update_results()
                .iter()
                .map(|update| UpdateResult {
                    generated_fields: update
                        .generated_fields()
                        .iter()
                        .cloned()
                        .map(from_sdk_field)
                        .collect(),
                })
                .collect(),
        })
    }

    async fn begin_transaction(&self, database: &str) -> Result<TransactionHandle, ServiceError> {
        let output = self
            .client
            .begin_transaction()
            .resource_arn(&self.resource_arn)
            .secret_arn(&self.secret_arn)
            .database(database)
            .send()
            .await
            .map_err(service_error)?;

        // An absent id is rejected by `Transaction::begin`.
        Ok(TransactionHandle {
            transaction_id: output.transaction_id().unwrap_or_default().to_string(),
        })
    }

    async fn commit_transaction(
        &self,
        handle: &TransactionHandle,
    ) -> Result<CommitResult, ServiceError> {
        let output = self
            .client
            .commit_transaction()
            .resource_arn(&self.resource_arn)
            .secret_arn(&self.secret_arn)
            .transaction_id(&handle.transaction_id)
            .send()
            .await
            .map_err(service_error)?;

        Ok(CommitResult {
            transaction_status: output.transaction_status().map(str::to_string),
        })
    }

    async fn rollback_transaction(
        &self,
        handle: &TransactionHandle,
    ) -> Result<RollbackResult, ServiceError> {
        let output = self
            .client
            .rollback_transaction()
            .resource_arn(&self.resource_arn)
            .secret_arn(&self.secret_arn)
            .transaction_id(&handle.transaction_id)
            .send()
            .await
            .map_err(service_error)?;

        Ok(RollbackResult {
            transaction_status: output.transaction_status().map(str::to_string),
        })
    }
}

/// `DescribeDBClusters` through the RDS control plane.
#[derive(Debug, Clone)]
pub struct RdsClusterMetadata {
    client: aws_sdk_rds::Client,
}

impl RdsClusterMetadata {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_rds::Client::new(sdk_config),
        }
    }
}

impl ClusterMetadata for RdsClusterMetadata {
    async fn describe_cluster(
        &self,
        cluster_id: &str,
    ) -> Result<Option<ClusterDescription>, ServiceError> {
        let output = self
            .client
            .describe_db_clusters()
            .db_cluster_identifier(cluster_id)
            .send()
            .await
            .map_err(service_error)?;

        Ok(output
            .db_clusters()
            .first()
            .map(|cluster| ClusterDescription {
                capacity: cluster.capacity(),
                status: cluster.status().map(str::to_string),
            }))
    }
}

/// Reduce an SDK error to the dispatcher's classification.
pub fn service_error<E, R>(err: SdkError<E, R>) -> ServiceError
where
    E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
    R: Debug,
{
    let kind = match &err {
        SdkError::ServiceError(_) => err
            .code()
            .map(ServiceErrorKind::from_code)
            .unwrap_or_else(|| ServiceErrorKind::Other("Unknown".to_string())),
        _ => ServiceErrorKind::Transport,
    };
    let message = match err.message() {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(&err).to_string(),
    };
    ServiceError::new(kind, message)
}

fn to_sdk_parameters(parameters: &[SqlParameter]) -> Option<Vec<SdkSqlParameter>> {
    if parameters.is_empty() {
        None
    } else {
        Some(parameters.iter().map(to_sdk_parameter).collect())
    }
}

fn to_sdk_parameter(parameter: &SqlParameter) -> SdkSqlParameter {
    SdkSqlParameter::builder()
        .name(&parameter.name)
        .value(to_sdk_field(&parameter.value))
        .build()
}

fn to_sdk_field(value: &SqlValue) -> Field {
    match value {
        SqlValue::IsNull(v) => Field::IsNull(*v),
        SqlValue::BooleanValue(v) => Field::BooleanValue(*v),
        SqlValue::LongValue(v) => Field::LongValue(*v),
        SqlValue::DoubleValue(v) => Field::DoubleValue(*v),
        SqlValue::StringValue(v) => Field::StringValue(v.clone()),
        SqlValue::BlobValue(v) => Field::BlobValue(Blob::new(v.clone())),
        SqlValue::ArrayValue(v) => Field::ArrayValue(to_sdk_array(v)),
        // Only ever read back from the service; binding one sends NULL.
        SqlValue::Unsupported => Field::IsNull(true),
    }
}

fn to_sdk_array(value: &ArrayValue) -> SdkArrayValue {
    match value {
        ArrayValue::BooleanValues(v) => SdkArrayValue::BooleanValues(v.clone()),
        ArrayValue::LongValues(v) => SdkArrayValue::LongValues(v.clone()),
        ArrayValue::DoubleValues(v) => SdkArrayValue::DoubleValues(v.clone()),
        ArrayValue::StringValues(v) => SdkArrayValue::StringValues(v.clone()),
        ArrayValue::ArrayValues(v) => {
            SdkArrayValue::ArrayValues(v.iter().map(|a| Some(to_sdk_array(a))).collect())
        }
        // Only ever read back from the service; binding one sends an empty array.
        ArrayValue::Unsupported => SdkArrayValue::StringValues(Vec::new()),
    }
}

fn from_sdk_field(field: Field) -> SqlValue {
    match field {
        Field::IsNull(v) => SqlValue::IsNull(v),
        Field::BooleanValue(v) => SqlValue::BooleanValue(v),
        Field::LongValue(v) => SqlValue::LongValue(v),
        Field::DoubleValue(v) => SqlValue::DoubleValue(v),
        Field::StringValue(v) => SqlValue::StringValue(v),
        Field::BlobValue(v) => SqlValue::BlobValue(v.into_inner()),
        Field::ArrayValue(v) => SqlValue::ArrayValue(from_sdk_array(v)),
        other => {
            warn!(field = ?other, "unsupported Data API field type");
            SqlValue::Unsupported
        }
    }
}

fn from_sdk_array(value: SdkArrayValue) -> ArrayValue {
    match value {
        SdkArrayValue::BooleanValues(v) => ArrayValue::BooleanValues(v),
        SdkArrayValue::LongValues(v) => ArrayValue::LongValues(v),
        SdkArrayValue::DoubleValues(v) => ArrayValue::DoubleValues(v),
        SdkArrayValue::StringValues(v) => ArrayValue::StringValues(v),
        SdkArrayValue::ArrayValues(v) => {
            ArrayValue::ArrayValues(v.into_iter().map(from_sdk_array).collect())
        }
        other => {
            warn!(array = ?other, "unsupported Data API array type");
            ArrayValue::Unsupported
        }
    }
}

fn from_sdk_column(column: &SdkColumnMetadata) -> ColumnMetadata {
    ColumnMetadata {
        name: column.name().map(str::to_string),
        label: column.label().map(str::to_string),
        type_id: column.r#type(),
        type_name: column.type_name().map(str::to_string),
        table_name: column.table_name().map(str::to_string),
        nullable: column.nullable(),
        is_auto_increment: column.is_auto_increment(),
    }
}
