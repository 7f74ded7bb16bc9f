//! Begin / execute / commit protocol over the Data API.
//!
//! A [`Transaction`] is consumed by [`Transaction::commit`] or
//! [`Transaction::rollback`], so a handle cannot be used after it was
//! finalised.

use tracing::{info, warn};

use crate::client::DataApi;
use crate::error::{Error, Result};
use crate::statement::{
    CommitResult, ExecuteResult, RollbackResult, Statement, TransactionHandle,
};

/// An open Data API transaction bound to one database.
#[must_use = "a transaction must be committed or rolled back"]
pub struct Transaction<'a, D: DataApi> {
    data: &'a D,
    handle: TransactionHandle,
    database: String,
}

impl<'a, D: DataApi> Transaction<'a, D> {
    pub async fn begin(data: &'a D, database: &str) -> Result<Self> {
        let handle = data.begin_transaction(database).await?;
        if handle.transaction_id.is_empty() {
            return Err(Error::MissingTransactionId);
        }
        info!(transaction_id = %handle.transaction_id, database = %database, "transaction started");
        Ok(Self {
            data,
            handle,
            database: database.to_string(),
        })
    }

    pub fn handle(&self) -> &TransactionHandle {
        &self.handle
    }

    /// Execute a statement inside this transaction and database.
    pub async fn execute(&self, statement: Statement) -> Result<ExecuteResult> {
        let statement = statement
            .with_database(self.database.as_str())
            .in_transaction(&self.handle);
        Ok(self.data.execute_statement(&statement).await?)
    }

    pub async fn commit(self) -> Result<CommitResult> {
        let result = self.data.commit_transaction(&self.handle).await?;
        info!(
            transaction_id = %self.handle.transaction_id,
            status = ?result.transaction_status,
            "transaction committed"
        );
        Ok(result)
    }

    pub async fn rollback(self) -> Result<RollbackResult> {
        let result = self.data.rollback_transaction(&self.handle).await?;
        info!(
            transaction_id = %self.handle.transaction_id,
            status = ?result.transaction_status,
            "transaction rolled back"
        );
        Ok(result)
    }

    /// Roll back after `cause`, logging rather than returning a rollback failure.
    pub async fn abandon(self, cause: &Error) {
        let transaction_id = self.handle.transaction_id.clone();
        warn!(transaction_id = %transaction_id, error = %cause, "rolling back transaction");
        if let Err(err) = self.rollback().await {
            warn!(
                transaction_id = %transaction_id,
                error = %err,
                "rollback failed; the Data API will expire the transaction"
            );
        }
    }
}
