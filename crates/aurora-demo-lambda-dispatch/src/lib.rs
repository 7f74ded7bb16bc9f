use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use aurora_demo_lambda_shared::{init_tracing, DispatchRequest, HtmlResponse, LambdaRuntime};
use aurora_demo_lib::{render, ClusterMetadata, DataApi, Dispatcher};

/// Entry point used by the Lambda runtime.
pub async fn run() -> Result<(), Error> {
    init_tracing();

    // Reads configuration and builds SDK clients (logs cold-start timing)
    let runtime = LambdaRuntime::from_env().await?;
    let runtime = &runtime;

    lambda_runtime::run(service_fn(move |event| handler(runtime, event))).await
}

/// Lambda handler invoked per request.
pub async fn handler(
    runtime: &LambdaRuntime,
    event: LambdaEvent<Value>,
) -> Result<HtmlResponse, Error> {
    Ok(handle_event(&runtime.dispatcher(), event).await)
}

/// Core handler logic, generic over the service seams for tests.
///
/// Never fails: malformed events and service errors both come back as a 200
/// page describing the problem.
pub async fn handle_event<D, M>(
    dispatcher: &Dispatcher<'_, D, M>,
    event: LambdaEvent<Value>,
) -> HtmlResponse
where
    D: DataApi,
    M: ClusterMetadata,
{
    let request_id = event.context.request_id.clone();

    let request: DispatchRequest = match serde_json::from_value(event.payload) {
        Ok(req) => req,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "failed to parse request");
            return render::exception("", &format!("Invalid request: {}", e)).into();
        }
    };

    let action_request = request.to_action_request();
    info!(
        request_id = %request_id,
        path = %action_request.path,
        action = %action_request.action,
        "handling dispatch request"
    );

    let page = dispatcher.handle(&action_request).await;

    info!(
        request_id = %request_id,
        action = %action_request.action,
        body_bytes = page.body.len(),
        "dispatch request complete"
    );

    page.into()
}
