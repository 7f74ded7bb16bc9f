use aurora_demo_lambda_dispatch::handle_event;
use aurora_demo_lambda_shared::{DispatchRequest, HtmlResponse};
use aurora_demo_lib::test_utils::{
    fixture_config, inserted_with_id, link_failure, DataApiCall, ScriptedClusterMetadata,
    ScriptedDataApi,
};
use aurora_demo_lib::{Dispatcher, WarmupPolicy};
use lambda_runtime::{Context, LambdaEvent};

async fn invoke(
    data: &ScriptedDataApi,
    metadata: &ScriptedClusterMetadata,
    request: DispatchRequest,
) -> HtmlResponse {
    let config = fixture_config();
    let dispatcher = Dispatcher::new(data, metadata, &config).with_warmup_policy(WarmupPolicy {
        max_attempts: 5,
        ..WarmupPolicy::default()
    });
    let payload = serde_json::to_value(request).expect("serializable payload");
    handle_event(&dispatcher, LambdaEvent::new(payload, Context::default())).await
}

#[tokio::test]
async fn every_action_answers_with_html_200() {
    for action in [
        None,
        Some("hi"),
        Some("test"),
        Some("warmup"),
        Some("init"),
        Some("select"),
        Some("batch"),
        Some("transaction"),
        Some("nope"),
    ] {
        let data = ScriptedDataApi::new().with_execute(Ok(inserted_with_id(1)));
        let metadata = ScriptedClusterMetadata::with_capacity(1);

        let response = invoke(&data, &metadata, DispatchRequest::new("/demo", action)).await;

        assert_eq!(response.status_code, 200, "action {action:?}");
        assert_eq!(
            response.headers.get("Content-Type").map(String::as_str),
            Some("text/html; charset=utf-8")
        );
        assert!(response.body.starts_with("<html><body>"));
        assert!(response.body.ends_with("</body></html>\n"));
        assert!(
            !response.body.contains("Exception"),
            "action {action:?} failed: {}",
            response.body
        );
    }
}

#[tokio::test]
async fn warmup_uses_configured_cap() {
    let data = ScriptedDataApi::new().with_execute_repeated(Err(link_failure()), 10);
    let metadata = ScriptedClusterMetadata::with_capacity(0);

    let response = invoke(&data, &metadata, DispatchRequest::new("/", Some("warmup"))).await;

    assert_eq!(data.execute_count(), 5);
    assert_eq!(metadata.describe_count(), 5);
    assert!(response.body.contains("after 5 attempts"));
}

#[tokio::test]
async fn transaction_event_commits_once() {
    let data = ScriptedDataApi::new()
        .with_execute(Ok(inserted_with_id(9)))
        .with_execute(Ok(inserted_with_id(10)));
    let metadata = ScriptedClusterMetadata::with_capacity(1);

    let response = invoke(&data, &metadata, DispatchRequest::new("/", Some("transaction"))).await;

    let commits = data
        .calls()
        .into_iter()
        .filter(|call| matches!(call, DataApiCall::Commit { .. }))
        .count();
    assert_eq!(commits, 1);
    assert!(response.body.contains("transactionStatus"));
}

#[tokio::test]
async fn path_is_escaped_in_page() {
    let data = ScriptedDataApi::new();
    let metadata = ScriptedClusterMetadata::with_capacity(1);

    let response = invoke(
        &data,
        &metadata,
        DispatchRequest::new("/<img src=x>", Some("hi")),
    )
    .await;

    assert!(response.body.contains("/&lt;img src=x&gt;"));
}
