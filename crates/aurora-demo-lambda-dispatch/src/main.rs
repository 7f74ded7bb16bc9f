//! AWS Lambda function serving the Aurora demo actions.

use lambda_runtime::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    aurora_demo_lambda_dispatch::run().await
}
