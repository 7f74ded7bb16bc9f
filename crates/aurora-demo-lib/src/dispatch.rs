//! The action dispatcher.
//!
//! [`Dispatcher::handle`] never fails: every error is rendered into the page
//! body and the caller always gets a 200 page.

use tracing::{error, info};

use crate::action::{Action, ActionRequest};
use crate::client::{ClusterMetadata, ClusterStatus, DataApi};
use crate::config::{DatabaseConfig, WarmupPolicy};
use crate::error::{Error, Result};
use crate::render::{self, Page, Payload};
use crate::schema::{
    second_transaction_name, BATCH_ROWS, CREATE_DATABASE_SQL, CREATE_TABLE_SQL, DEMO_DATABASE,
    FIRST_TRANSACTION_NAME, INSERT_NAME_SQL, INSERT_ROW_SQL, SEED_DATE, SEED_INSERT_SQL,
    SEED_NAME, SELECT_ALL_SQL,
};
use crate::statement::{
    BatchResult, BatchStatement, CommitResult, ExecuteResult, SqlParameter, Statement,
};
use crate::transaction::Transaction;
use crate::warmup::{warm_up, WarmupOutcome, WarmupReport};

/// Routes actions to the Data API and the cluster metadata service.
pub struct Dispatcher<'a, D, M> {
    data: &'a D,
    metadata: &'a M,
    config: &'a DatabaseConfig,
    warmup: WarmupPolicy,
}

impl<'a, D, M> Dispatcher<'a, D, M>
where
    D: DataApi,
    M: ClusterMetadata,
{
    pub fn new(data: &'a D, metadata: &'a M, config: &'a DatabaseConfig) -> Self {
        Self {
            data,
            metadata,
            config,
            warmup: WarmupPolicy::default(),
        }
    }

    pub fn with_warmup_policy(mut self, policy: WarmupPolicy) -> Self {
        self.warmup = policy;
        self
    }

    /// Run one action and render its page.
    pub async fn handle(&self, request: &ActionRequest) -> Page {
        info!(action = %request.action, path = %request.path, "handling action");

        match self.dispatch(request).await {
            Ok(page) => page,
            Err(err) => {
                error!(
                    action = %request.action,
                    path = %request.path,
                    error = %err,
                    "action failed"
                );
                render::exception(&request.path, &err)
            }
        }
    }

    async fn dispatch(&self, request: &ActionRequest) -> Result<Page> {
        let path = request.path.as_str();
        let action = &request.action;

        match action {
            Action::Probe => {
                let status = self.probe().await?;
                Ok(render::status(path, &status))
            }
            Action::Warmup => {
                let report = self.warmup().await?;
                match &report.outcome {
                    WarmupOutcome::Ready(result) => {
                        render::result(action, path, Payload::Data, result)
                    }
                    WarmupOutcome::Exhausted(last) => {
                        Ok(render::warmup_exhausted(path, report.attempts, last))
                    }
                }
            }
            Action::Greet => Ok(render::greeting(path)),
            Action::Init => {
                let result = self.init().await?;
                render::result(action, path, Payload::Response, &result)
            }
            Action::Select => {
                let result = self.select().await?;
                render::result(action, path, Payload::Data, &result)
            }
            Action::Batch => {
                let result = self.batch().await?;
                render::result(action, path, Payload::Response, &result)
            }
            Action::Transaction => {
                let result = self.transaction().await?;
                render::result(action, path, Payload::Response, &result)
            }
            Action::Unknown(name) => Ok(render::unknown_action(name, path)),
        }
    }

    /// Read the cluster's current capacity.
    pub async fn probe(&self) -> Result<ClusterStatus> {
        let cluster_id = self.config.cluster_id.as_str();
        let cluster = self
            .metadata
            .describe_cluster(cluster_id)
            .await?
            .ok_or_else(|| Error::ClusterNotFound {
                cluster_id: cluster_id.to_string(),
            })?;
        let capacity = cluster.capacity.ok_or_else(|| Error::CapacityUnavailable {
            cluster_id: cluster_id.to_string(),
        })?;

        let status = ClusterStatus {
            capacity: u32::try_from(capacity).unwrap_or(0),
        };
        info!(
            cluster_id = %cluster_id,
            capacity = status.capacity,
            state = %status.state(),
            "cluster probed"
        );
        Ok(status)
    }

    pub async fn warmup(&self) -> Result<WarmupReport> {
        warm_up(
            self.data,
            self.metadata,
            &self.config.cluster_id,
            &self.warmup,
        )
        .await
    }

    /// Create the demo schema and seed one row.
    ///
    /// The three statements are independent; a failure leaves the earlier
    /// ones applied.
    pub async fn init(&self) -> Result<ExecuteResult> {
        self.data
            .execute_statement(&Statement::new(CREATE_DATABASE_SQL))
            .await?;
        self.data
            .execute_statement(&Statement::new(CREATE_TABLE_SQL))
            .await?;

        let seed = Statement::new(SEED_INSERT_SQL)
            .with_parameter(SqlParameter::string("date", SEED_DATE))
            .with_parameter(SqlParameter::string("name", SEED_NAME));
        Ok(self.data.execute_statement(&seed).await?)
    }

    pub async fn select(&self) -> Result<ExecuteResult> {
        let statement = Statement::new(SELECT_ALL_SQL)
            .with_database(DEMO_DATABASE)
            .with_result_metadata();
        Ok(self.data.execute_statement(&statement).await?)
    }

    /// Insert both demo rows with a single batch call.
    pub async fn batch(&self) -> Result<BatchResult> {
        let batch = BATCH_ROWS.iter().fold(
            BatchStatement::new(INSERT_ROW_SQL).with_database(DEMO_DATABASE),
            |batch, (name, date)| {
                batch.with_parameter_set(vec![
                    SqlParameter::string("name", *name),
                    SqlParameter::string("date", *date),
                ])
            },
        );
        let result = self.data.batch_execute_statement(&batch).await?;
        info!(
            parameter_sets = batch.parameter_sets.len(),
            updates = result.update_results.len(),
            "batch executed"
        );
        Ok(result)
    }

    /// Insert a row, then a second row naming the first row's key, atomically.
    ///
    /// Any failure after the transaction opened rolls it back before the
    /// error is returned.
    pub async fn transaction(&self) -> Result<CommitResult> {
        let tx = Transaction::begin(self.data, DEMO_DATABASE).await?;

        match insert_dependent_rows(&tx).await {
            Ok(first_id) => {
                info!(first_id = first_id, "dependent rows inserted");
                tx.commit().await
            }
            Err(err) => {
                tx.abandon(&err).await;
                Err(err)
            }
        }
    }
}

async fn insert_dependent_rows<D: DataApi>(tx: &Transaction<'_, D>) -> Result<i64> {
    let first = tx
        .execute(
            Statement::new(INSERT_NAME_SQL)
                .with_parameter(SqlParameter::string("name", FIRST_TRANSACTION_NAME)),
        )
        .await?;
    let first_id = first.generated_id().ok_or(Error::MissingGeneratedId)?;

    tx.execute(
        Statement::new(INSERT_NAME_SQL)
            .with_parameter(SqlParameter::string("name", second_transaction_name(first_id))),
    )
    .await?;

    Ok(first_id)
}
