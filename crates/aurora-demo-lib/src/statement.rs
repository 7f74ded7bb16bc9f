//! Statements sent to the Data API and the results it returns.
//!
//! Values serialise in the Data API's own JSON shape (`{"stringValue": "x"}`)
//! so rendered pages look like the service's responses.

use serde::{Deserialize, Serialize};

/// A single typed value, either bound as a parameter or returned in a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SqlValue {
    IsNull(bool),
    BooleanValue(bool),
    LongValue(i64),
    DoubleValue(f64),
    StringValue(String),
    BlobValue(Vec<u8>),
    ArrayValue(ArrayValue),
    /// A field type this client does not model.
    Unsupported,
}

impl SqlValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self::StringValue(value.into())
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::LongValue(v) => Some(*v),
            _ => None,
        }
    }
}

/// Array column values.
///
/// Scalar elements may be NULL and serialise as `null`; nested arrays may not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrayValue {
    BooleanValues(Vec<Option<bool>>),
    LongValues(Vec<Option<i64>>),
    DoubleValues(Vec<Option<f64>>),
    StringValues(Vec<Option<String>>),
    ArrayValues(Vec<ArrayValue>),
    /// An array type this client does not model.
    Unsupported,
}

/// A named parameter bound to a `:name` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlParameter {
    pub name: String,
    pub value: SqlValue,
}

impl SqlParameter {
    pub fn new(name: impl Into<String>, value: SqlValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Bind a string value.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, SqlValue::string(value))
    }
}

/// One SQL statement for `ExecuteStatement`.
///
/// The resource and secret ARNs are not part of the statement; the service
/// adapter binds them to every call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    pub sql: String,
    pub parameters: Vec<SqlParameter>,
    pub database: Option<String>,
    pub transaction_id: Option<String>,
    pub include_result_metadata: bool,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            ..Self::default()
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_parameter(mut self, parameter: SqlParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_result_metadata(mut self) -> Self {
        self.include_result_metadata = true;
        self
    }

    /// Run the statement inside an open transaction.
    pub fn in_transaction(mut self, handle: &TransactionHandle) -> Self {
        self.transaction_id = Some(handle.transaction_id.clone());
        self
    }
}

/// One SQL statement executed once per parameter set by `BatchExecuteStatement`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchStatement {
    pub sql: String,
    pub database: Option<String>,
    pub parameter_sets: Vec<Vec<SqlParameter>>,
}

impl BatchStatement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            ..Self::default()
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_parameter_set(mut self, set: Vec<SqlParameter>) -> Self {
        self.parameter_sets.push(set);
        self
    }
}

/// Column description returned when result metadata is requested.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub type_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    pub nullable: i32,
    pub is_auto_increment: bool,
}

/// Result of `ExecuteStatement`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<Vec<SqlValue>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_metadata: Option<Vec<ColumnMetadata>>,
    pub number_of_records_updated: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_fields: Option<Vec<SqlValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_records: Option<String>,
}

impl ExecuteResult {
    /// The first generated field as a numeric key (auto-increment inserts).
    pub fn generated_id(&self) -> Option<i64> {
        self.generated_fields
            .as_ref()
            .and_then(|fields| fields.first())
            .and_then(SqlValue::as_long)
    }
}

/// Per-parameter-set outcome of a batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub generated_fields: Vec<SqlValue>,
}

/// Result of `BatchExecuteStatement`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub update_results: Vec<UpdateResult>,
}

/// Identifier of an open transaction, valid until commit or rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHandle {
    pub transaction_id: String,
}

/// Result of `CommitTransaction`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_status: Option<String>,
}

/// Result of `RollbackTransaction`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_use_data_api_shape() {
        let param = SqlParameter::string("name", "Welcome");
        let json = serde_json::to_value(&param).unwrap();
        assert_eq!(
            json,
            json!({"name": "name", "value": {"stringValue": "Welcome"}})
        );
        assert_eq!(
            serde_json::to_value(SqlValue::IsNull(true)).unwrap(),
            json!({"isNull": true})
        );
    }

    #[test]
    fn array_elements_keep_their_nulls() {
        let value = SqlValue::ArrayValue(ArrayValue::LongValues(vec![Some(1), None, Some(3)]));
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, json!({"arrayValue": {"longValues": [1, null, 3]}}));
        assert_eq!(serde_json::from_value::<SqlValue>(json).unwrap(), value);
    }

    #[test]
    fn unsupported_values_are_not_rendered_as_null() {
        let json = serde_json::to_value(SqlValue::Unsupported).unwrap();
        assert_eq!(json, json!("unsupported"));
        assert_ne!(json, json!({"isNull": true}));
    }

    #[test]
    fn generated_id_reads_first_long_field() {
        let result = ExecuteResult {
            number_of_records_updated: 1,
            generated_fields: Some(vec![SqlValue::LongValue(42), SqlValue::LongValue(7)]),
            ..ExecuteResult::default()
        };
        assert_eq!(result.generated_id(), Some(42));
    }

    #[test]
    fn generated_id_ignores_non_numeric_fields() {
        let result = ExecuteResult {
            generated_fields: Some(vec![SqlValue::string("42")]),
            ..ExecuteResult::default()
        };
        assert_eq!(result.generated_id(), None);
        assert_eq!(ExecuteResult::default().generated_id(), None);
    }

    #[test]
    fn statement_builder_threads_transaction() {
        let handle = TransactionHandle {
            transaction_id: "tx-1".to_string(),
        };
        let stmt = Statement::new("select 1")
            .with_database("demodb")
            .in_transaction(&handle);
        assert_eq!(stmt.transaction_id.as_deref(), Some("tx-1"));
        assert_eq!(stmt.database.as_deref(), Some("demodb"));
        assert!(!stmt.include_result_metadata);
    }

    #[test]
    fn execute_result_omits_absent_fields() {
        let json = serde_json::to_value(ExecuteResult::default()).unwrap();
        assert_eq!(json, json!({"numberOfRecordsUpdated": 0}));
    }
}
