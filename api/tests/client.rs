//! HTTP-level tests for `SlackListsClient` against a mock Slack server

use serde_json::json;
use slack_lists_api::{
    ApiError, ClientConfig, CreateItemRequest, InitialField, ListItemsRequest, SlackListsClient,
};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SlackListsClient {
    let config = ClientConfig::new("xoxb-test").with_api_url(server.uri());
    SlackListsClient::from_config(&config).expect("client should build")
}

#[tokio::test]
async fn test_create_item_sends_bearer_and_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/slackLists.items.create"))
        .and(header("authorization", "Bearer xoxb-test"))
        .and(body_partial_json(json!({
            "list_id": "F123",
            "initial_fields": [{"column_id": "Col10000000"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "item": {"id": "Rec001", "list_id": "F123", "date_created": 1_700_000_000}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CreateItemRequest::new("F123", vec![InitialField::text("Col10000000", "Ship it")]);
    let item = client_for(&server)
        .create_item(&request)
        .await
        .expect("create should succeed");

    assert_eq!(item.id, "Rec001");
    assert_eq!(item.list_id.as_deref(), Some("F123"));
}

#[tokio::test]
async fn test_slack_error_codes_are_typed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slackLists.items.list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": false, "error": "invalid_auth"})),
        )
        .mount(&server)
        .await;

    let result = client_for(&server)
        .list_items(&ListItemsRequest::new("F123", 10))
        .await;

    match result {
        Err(ApiError::Unauthorized(code)) => assert_eq!(code, "invalid_auth"),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slackLists.items.list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": false, "error": "list_not_found"})),
        )
        .mount(&server)
        .await;

    let result = client_for(&server)
        .list_items(&ListItemsRequest::new("F404", 10))
        .await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_http_429_carries_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/slackLists.items.create"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "17"))
        .mount(&server)
        .await;

    let request = CreateItemRequest::new("F123", vec![InitialField::text("Col10000000", "x")]);
    let result = client_for(&server).create_item(&request).await;

    match result {
        Err(ApiError::RateLimited { retry_after_secs }) => assert_eq!(retry_after_secs, Some(17)),
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_items_sends_cursor_and_reads_next() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slackLists.items.list"))
        .and(query_param("list_id", "F123"))
        .and(query_param("limit", "25"))
        .and(query_param("cursor", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "items": [{"id": "Rec3"}],
            "response_metadata": {"next_cursor": "page3"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ListItemsRequest::new("F123", 25).with_cursor(Some("page2".to_string()));
    let page = client_for(&server)
        .list_items(&request)
        .await
        .expect("page should load");

    assert_eq!(page.items[0].id, "Rec3");
    assert_eq!(page.next_cursor(), Some("page3"));
}

#[tokio::test]
async fn test_unexpected_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slackLists.items.list"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .list_items(&ListItemsRequest::new("F123", 10))
        .await;

    match result {
        Err(ApiError::ApiError { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message, "bad gateway");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}
