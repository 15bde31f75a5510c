use lark_client::{
    LarkClient, MissingTokenPolicy, NodeCreateRequest, NodeSearchRequest, PaginationConfig,
    UserTokenAuth,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a test client against the mock server
fn create_test_client(server: &MockServer) -> LarkClient {
    LarkClient::new(server.uri(), UserTokenAuth::new("u-wiki")).expect("Failed to create client")
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 0, "msg": "success", "data": data}))
}

/// Test getting a space unwraps the `space` object
#[tokio::test]
async fn test_get_space() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/open-apis/wiki/v2/spaces/6946843325487912356"))
        .and(header("authorization", "Bearer u-wiki"))
        .respond_with(ok(json!({
            "space": {"space_id": "6946843325487912356", "name": "Engineering", "visibility": "private"}
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let space = client
        .wiki()
        .get_space("6946843325487912356", None)
        .await
        .expect("Failed to get space");

    assert_eq!(space.name.as_deref(), Some("Engineering"));
}

/// Test resolving a node by document token
#[tokio::test]
async fn test_get_node_by_obj_token() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/open-apis/wiki/v2/spaces/get_node"))
        .and(query_param("token", "doxcnABC"))
        .and(query_param("obj_type", "docx"))
        .respond_with(ok(json!({
            "node": {"node_token": "wikcn1", "obj_token": "doxcnABC", "obj_type": "docx", "has_child": false}
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let node = client
        .wiki()
        .get_node("doxcnABC", Some("docx"), None)
        .await
        .expect("Failed to get node");

    assert_eq!(node.node_token, "wikcn1");
    assert_eq!(node.has_child, Some(false));
}

/// Test creating a node
#[tokio::test]
async fn test_create_node() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/open-apis/wiki/v2/spaces/sp1/nodes"))
        .and(body_json(json!({"obj_type": "docx", "node_type": "origin", "title": "Runbook"})))
        .respond_with(ok(json!({"node": {"node_token": "wikcnNew", "title": "Runbook"}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let request = NodeCreateRequest {
        obj_type: "docx".to_string(),
        node_type: "origin".to_string(),
        parent_node_token: None,
        origin_node_token: None,
        title: Some("Runbook".to_string()),
    };
    let node = client
        .wiki()
        .create_node("sp1", &request, None)
        .await
        .expect("Failed to create node");

    assert_eq!(node.node_token, "wikcnNew");
}

/// Test listing child nodes of a parent
#[tokio::test]
async fn test_list_nodes_with_iterator() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/open-apis/wiki/v2/spaces/sp1/nodes"))
        .and(query_param("parent_node_token", "wikcnParent"))
        .and(query_param("page_token", "p2"))
        .respond_with(ok(json!({"items": [{"node_token": "n3"}], "has_more": false})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/open-apis/wiki/v2/spaces/sp1/nodes"))
        .and(query_param("parent_node_token", "wikcnParent"))
        .respond_with(ok(json!({
            "items": [{"node_token": "n1"}, {"node_token": "n2"}],
            "has_more": true,
            "page_token": "p2"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let pages = client
        .wiki()
        .list_nodes_with_iterator("sp1", Some("wikcnParent"), Some(2), None)
        .collect_pages()
        .await
        .expect("Failed to list nodes");

    let tokens: Vec<String> = pages
        .into_iter()
        .flat_map(|p| p.items)
        .map(|n| n.node_token)
        .collect();
    assert_eq!(tokens, vec!["n1", "n2", "n3"]);
}

/// Test a space listing where the server forgets the token
#[tokio::test]
async fn test_list_spaces_missing_token() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/open-apis/wiki/v2/spaces"))
        .respond_with(ok(json!({"items": [{"space_id": "s1"}], "has_more": true})))
        .mount(&server)
        .await;

    let client = create_test_client(&server);

    let pages = client
        .wiki()
        .list_spaces_with_iterator(None, None)
        .collect_pages()
        .await
        .expect("Failed to list spaces");
    assert_eq!(pages.len(), 1, "terminates when no token is returned");

    let restarting = PaginationConfig::new()
        .missing_token(MissingTokenPolicy::RestartFromFirstPage)
        .max_pages(3);
    let pages = client
        .wiki()
        .list_spaces_with_iterator(None, None)
        .with_config(restarting)
        .collect_pages()
        .await
        .expect("Failed to list spaces");
    assert_eq!(pages.len(), 3, "refetches the first page until capped");
    assert!(pages.iter().all(|p| p.items[0].space_id == "s1"));
}

/// Test node search
#[tokio::test]
async fn test_search_nodes_with_iterator() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/open-apis/wiki/v1/nodes/search"))
        .and(body_json(json!({"query": "oncall"})))
        .respond_with(ok(json!({
            "items": [{"node_id": "wikcnHit", "title": "Oncall guide", "obj_type": 8}],
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let request = NodeSearchRequest {
        query: "oncall".to_string(),
        space_id: None,
        node_id: None,
    };
    let pages = client
        .wiki()
        .search_nodes_with_iterator(&request, None, None)
        .expect("Failed to build search")
        .collect_pages()
        .await
        .expect("Failed to search nodes");

    assert_eq!(pages[0].items[0].title.as_deref(), Some("Oncall guide"));
}
