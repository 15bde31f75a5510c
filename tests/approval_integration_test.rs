use chrono::{TimeZone, Utc};
use futures_util::StreamExt;
use lark_client::{
    InstanceCreateRequest, LarkClient, LarkError, PageOutcome, TaskSearchRequest, TaskTopic,
    TenantTokenAuth,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a test client against the mock server
fn create_test_client(server: &MockServer) -> LarkClient {
    LarkClient::new(server.uri(), TenantTokenAuth::new("t-approval"))
        .expect("Failed to create client")
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 0, "msg": "success", "data": data}))
}

/// Test fetching an approval definition
#[tokio::test]
async fn test_get_approval() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/open-apis/approval/v4/approvals/LEAVE-01"))
        .respond_with(ok(json!({
            "approval_name": "Leave request",
            "status": "ACTIVE",
            "form": "[]",
            "node_list": [{"name": "Manager", "need_approver": true, "node_id": "n1"}]
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let approval = client
        .approval()
        .get_approval("LEAVE-01", None)
        .await
        .expect("Failed to get approval");

    assert_eq!(approval.approval_name.as_deref(), Some("Leave request"));
    assert_eq!(approval.node_list.unwrap().len(), 1);
}

/// Test instance creation carries an idempotency key
#[tokio::test]
async fn test_create_instance() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/open-apis/approval/v4/instances"))
        .and(body_partial_json(json!({"approval_code": "LEAVE-01", "form": "[]"})))
        .respond_with(ok(json!({"instance_code": "INST-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let mut request = InstanceCreateRequest::new("LEAVE-01", "[]");
    request.user_id = Some("u1".to_string());
    assert!(request.uuid.is_some(), "new() should generate a uuid");

    let created = client
        .approval()
        .create_instance(&request, None)
        .await
        .expect("Failed to create instance");

    assert_eq!(created.instance_code, "INST-1");
}

/// Test that an upstream error propagates to the caller
#[tokio::test]
async fn test_get_instance_error_propagates() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/open-apis/approval/v4/instances/missing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1390002,
            "msg": "instance code not found"
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let err = client
        .approval()
        .get_instance("missing", None)
        .await
        .expect_err("Expected an error");

    assert_eq!(err.code(), Some(1390002));
}

/// Test listing instance codes across pages
#[tokio::test]
async fn test_list_instances_with_iterator() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

    Mock::given(method("GET"))
        .and(path("/open-apis/approval/v4/instances"))
        .and(query_param("approval_code", "LEAVE-01"))
        .and(query_param("start_time", "1704067200000"))
        .and(query_param("page_token", "next"))
        .respond_with(ok(json!({"instance_code_list": ["c"], "has_more": false})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/open-apis/approval/v4/instances"))
        .and(query_param("approval_code", "LEAVE-01"))
        .and(query_param("end_time", "1706745600000"))
        .respond_with(ok(json!({
            "instance_code_list": ["a", "b"],
            "has_more": true,
            "page_token": "next"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let pages = client
        .approval()
        .list_instances_with_iterator("LEAVE-01", start, end, Some(100), None)
        .collect_pages()
        .await
        .expect("Failed to list instances");

    let codes: Vec<String> = pages
        .into_iter()
        .flat_map(|p| p.instance_code_list)
        .collect();
    assert_eq!(codes, vec!["a", "b", "c"]);
}

/// Test the task query stream ends with a sentinel on failure
#[tokio::test]
async fn test_query_tasks_failure_sentinel() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/open-apis/approval/v4/tasks/query"))
        .and(query_param("topic", "1"))
        .and(query_param("page_token", "T1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/open-apis/approval/v4/tasks/query"))
        .and(query_param("user_id", "u1"))
        .respond_with(ok(json!({
            "tasks": [{"task_id": "t1", "title": "Leave"}],
            "has_more": true,
            "page_token": "T1"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let outcomes: Vec<_> = client
        .approval()
        .query_tasks_with_iterator("u1", TaskTopic::Todo, None, None)
        .into_stream()
        .collect()
        .await;

    assert_eq!(outcomes.len(), 2);
    match &outcomes[0] {
        PageOutcome::Page(page) => assert_eq!(page.tasks[0].task_id.as_deref(), Some("t1")),
        other => panic!("Expected a page, got {:?}", other),
    }
    assert!(matches!(
        outcomes[1],
        PageOutcome::Failure(LarkError::Api { status: 500, .. })
    ));
}

/// Test task search posts the filter on every page
#[tokio::test]
async fn test_search_tasks_with_iterator() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/open-apis/approval/v4/tasks/search"))
        .and(body_partial_json(json!({"approval_code": "LEAVE-01"})))
        .respond_with(ok(json!({"count": 1, "task_list": [{"task": {"task_id": "t9"}}]})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let request = TaskSearchRequest {
        approval_code: Some("LEAVE-01".to_string()),
        ..Default::default()
    };
    let mut iter = client
        .approval()
        .search_tasks_with_iterator(&request, Some(10), None)
        .expect("Failed to build search");

    let page = iter.next_page().await.into_page().expect("Expected a page");
    assert_eq!(page.count, Some(1));
    assert_eq!(page.task_list.len(), 1);
    assert!(iter.next_page().await.is_end());
}
