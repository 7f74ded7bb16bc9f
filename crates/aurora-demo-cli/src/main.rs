use std::time::Duration;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use aurora_demo_lambda_shared::{RdsClusterMetadata, RdsDataApi, TransportConfig};
use aurora_demo_lib::{Action, ActionRequest, DatabaseConfig, Dispatcher, WarmupPolicy};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Run one Aurora demo action against a Data API cluster and print the page"
)]
struct Cli {
    /// Action to run (test, warmup, hi, init, select, batch, transaction).
    #[arg(long)]
    action: Option<String>,

    /// Path echoed back in the rendered page.
    #[arg(long, default_value = "/")]
    path: String,

    /// Data API resource ARN of the cluster.
    #[arg(long, env = "DBCLUSTERARN")]
    resource_arn: String,

    /// Secrets Manager ARN holding the database credentials.
    #[arg(long, env = "SECRETARN")]
    secret_arn: String,

    /// Cluster identifier used for capacity checks.
    #[arg(long, env = "DBCLUSTERID")]
    cluster_id: String,

    /// Maximum warm-up attempts.
    #[arg(long, env = "WARMUP_MAX_ATTEMPTS", default_value_t = WarmupPolicy::DEFAULT_MAX_ATTEMPTS)]
    warmup_attempts: u32,

    /// Pause between retryable warm-up attempts, in milliseconds.
    #[arg(long, env = "WARMUP_RETRY_DELAY_MS", default_value_t = 0)]
    warmup_delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    ensure!(
        cli.warmup_attempts > 0,
        "--warmup-attempts must be at least 1"
    );
    let policy = WarmupPolicy {
        max_attempts: cli.warmup_attempts,
        retry_delay: Duration::from_millis(cli.warmup_delay_ms),
    };
    let config = DatabaseConfig::new(cli.resource_arn, cli.secret_arn, cli.cluster_id);
    let transport =
        TransportConfig::from_env().context("invalid AWS transport configuration")?;
    debug!(?transport, ?policy, "loading AWS configuration");

    let sdk_config = transport.load_sdk_config().await;
    let data = RdsDataApi::new(&sdk_config, &config);
    let metadata = RdsClusterMetadata::new(&sdk_config);

    let request = ActionRequest::new(Action::parse(cli.action.as_deref()), cli.path);
    let page = Dispatcher::new(&data, &metadata, &config)
        .with_warmup_policy(policy)
        .handle(&request)
        .await;

    print!("{}", page);
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
