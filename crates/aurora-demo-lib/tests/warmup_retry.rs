//! Warm-up retry behaviour against scripted services.

use aurora_demo_lib::test_utils::{
    fixture_config, link_failure, syntax_error, ScriptedClusterMetadata, ScriptedDataApi,
};
use aurora_demo_lib::{
    warm_up, Action, ActionRequest, Dispatcher, Error, ExecuteResult, ServiceError,
    ServiceErrorKind, SqlValue, WarmupOutcome, WarmupPolicy,
};

fn one_row() -> ExecuteResult {
    ExecuteResult {
        records: Some(vec![vec![SqlValue::LongValue(1)]]),
        ..ExecuteResult::default()
    }
}

#[tokio::test]
async fn retries_link_failures_until_ready() {
    let data = ScriptedDataApi::new()
        .with_execute_repeated(Err(link_failure()), 3)
        .with_execute(Ok(one_row()));
    let metadata = ScriptedClusterMetadata::with_capacity(0);
    let config = fixture_config();

    let report = warm_up(&data, &metadata, &config.cluster_id, &WarmupPolicy::default())
        .await
        .expect("warm-up should complete");

    assert_eq!(data.execute_count(), 4);
    assert_eq!(metadata.describe_count(), 3);
    assert_eq!(report.attempts, 4);
    assert_eq!(report.outcome, WarmupOutcome::Ready(one_row()));
    assert!(data
        .executed()
        .iter()
        .all(|statement| statement.sql == "select 1" && statement.parameters.is_empty()));
    assert!(metadata.calls().iter().all(|id| id == "demo-cluster"));
}

#[tokio::test]
async fn stops_after_ten_attempts() {
    let data = ScriptedDataApi::new().with_execute_repeated(Err(link_failure()), 20);
    let metadata = ScriptedClusterMetadata::with_capacity(0);
    let config = fixture_config();

    let report = warm_up(&data, &metadata, &config.cluster_id, &WarmupPolicy::default())
        .await
        .expect("exhaustion is not an error");

    assert_eq!(data.execute_count(), 10);
    assert_eq!(report.attempts, 10);
    assert!(!report.is_ready());
    assert_eq!(report.outcome, WarmupOutcome::Exhausted(link_failure()));
}

#[tokio::test]
async fn fatal_error_is_not_retried() {
    let data = ScriptedDataApi::new()
        .with_execute(Err(syntax_error()))
        .with_execute(Ok(one_row()));
    let metadata = ScriptedClusterMetadata::with_capacity(2);
    let config = fixture_config();

    let err = warm_up(&data, &metadata, &config.cluster_id, &WarmupPolicy::default())
        .await
        .unwrap_err();

    assert_eq!(data.execute_count(), 1);
    assert_eq!(metadata.describe_count(), 0);
    match err {
        Error::Service(service) => assert_eq!(service, syntax_error()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn fatal_error_after_retries_stops_the_loop() {
    let forbidden = ServiceError::new(ServiceErrorKind::Forbidden, "not authorized");
    let data = ScriptedDataApi::new()
        .with_execute(Err(link_failure()))
        .with_execute(Err(forbidden));
    let metadata = ScriptedClusterMetadata::with_capacity(0);
    let config = fixture_config();

    let result = warm_up(&data, &metadata, &config.cluster_id, &WarmupPolicy::default()).await;

    assert!(result.is_err());
    assert_eq!(data.execute_count(), 2);
    assert_eq!(metadata.describe_count(), 1);
}

#[tokio::test]
async fn describe_failures_do_not_change_control_flow() {
    let data = ScriptedDataApi::new()
        .with_execute_repeated(Err(link_failure()), 2)
        .with_execute(Ok(one_row()));
    let metadata = ScriptedClusterMetadata::with_capacity(0)
        .with_response(Err(ServiceError::new(
            ServiceErrorKind::Forbidden,
            "rds:DescribeDBClusters denied",
        )))
        .with_response(Ok(None));
    let config = fixture_config();

    let report = warm_up(&data, &metadata, &config.cluster_id, &WarmupPolicy::default())
        .await
        .expect("diagnostics never fail the warm-up");

    assert!(report.is_ready());
    assert_eq!(data.execute_count(), 3);
    assert_eq!(metadata.describe_count(), 2);
}

#[tokio::test]
async fn custom_policy_caps_attempts() {
    let data = ScriptedDataApi::new().with_execute_repeated(Err(link_failure()), 10);
    let metadata = ScriptedClusterMetadata::with_capacity(0);
    let config = fixture_config();
    let policy = WarmupPolicy {
        max_attempts: 3,
        ..WarmupPolicy::default()
    };

    let report = warm_up(&data, &metadata, &config.cluster_id, &policy)
        .await
        .unwrap();

    assert_eq!(report.attempts, 3);
    assert_eq!(data.execute_count(), 3);
}

#[tokio::test]
async fn warmup_page_renders_result_or_last_failure() {
    let config = fixture_config();
    let metadata = ScriptedClusterMetadata::with_capacity(0);

    let ready = ScriptedDataApi::new()
        .with_execute(Err(link_failure()))
        .with_execute(Ok(one_row()));
    let page = Dispatcher::new(&ready, &metadata, &config)
        .handle(&ActionRequest::new(Action::Warmup, "/warm"))
        .await;
    assert!(page.contains("ACTION warmup This is path /warm here is your data"));
    assert!(page.contains("\"longValue\": 1"));

    let never = ScriptedDataApi::new().with_execute_repeated(Err(link_failure()), 10);
    let page = Dispatcher::new(&never, &metadata, &config)
        .handle(&ActionRequest::new(Action::Warmup, "/warm"))
        .await;
    assert!(page.contains("after 10 attempts"));
    assert!(page.contains("Communications link failure"));
    assert_eq!(never.execute_count(), 10);

    let fatal = ScriptedDataApi::new().with_execute(Err(syntax_error()));
    let page = Dispatcher::new(&fatal, &metadata, &config)
        .handle(&ActionRequest::new(Action::Warmup, "/warm"))
        .await;
    assert!(page.contains("Exception BadRequestException: Database error code: 1064"));
    assert!(page.contains("You've hit /warm"));
    assert_eq!(fatal.execute_count(), 1);
}
