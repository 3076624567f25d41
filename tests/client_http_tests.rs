//! ApiClient behavior against a mocked Postman API

use postmanctl::client::ApiClient;
use postmanctl::config::ContextConfig;
use postmanctl::resources::{ResourceScope, ResourceType};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let mut ctx = ContextConfig::new("test");
    ctx.api_root = format!("{}/", server.uri());
    ctx.api_key = Some("test-key".to_string());
    ApiClient::new(&ctx).expect("client should build")
}

#[tokio::test]
async fn test_list_unwraps_envelope_and_sends_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collections"))
        .and(header("X-Api-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collections": [
                {"id": "c1", "name": "Orders", "uid": "1-c1"},
                {"id": "c2", "name": "Payments", "uid": "1-c2"}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let items = client
        .list(ResourceType::Collection, &ResourceScope::default())
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["name"], "Payments");
}

#[tokio::test]
async fn test_list_apis_passes_workspace() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apis"))
        .and(query_param("workspace", "ws-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"apis": []})))
        .expect(1)
        .mount(&server)
        .await;

    let scope = ResourceScope {
        workspace: Some("ws-1".into()),
        ..Default::default()
    };
    let items = client_for(&server).list(ResourceType::Api, &scope).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_get_unwraps_single_resource() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apis/a1/versions/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": {"id": "v1", "name": "1.0", "schema": ["s1"]}
        })))
        .mount(&server)
        .await;

    let scope = ResourceScope {
        api: Some("a1".into()),
        ..Default::default()
    };
    let doc = client_for(&server)
        .get(ResourceType::ApiVersion, "v1", &scope)
        .await
        .unwrap();
    assert_eq!(doc, json!({"id": "v1", "name": "1.0", "schema": ["s1"]}));
}

#[tokio::test]
async fn test_error_response_carries_api_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/environments/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"name": "instanceNotFoundError", "message": "We could not find the environment you are looking for"}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get(ResourceType::Environment, "missing", &ResourceScope::default())
        .await
        .unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("404"), "{msg}");
    assert!(msg.contains("could not find the environment"), "{msg}");
}

#[tokio::test]
async fn test_replace_wraps_document_and_returns_uid() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/environments/1-e1"))
        .and(body_json(json!({"environment": {"name": "Staging", "values": []}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "environment": {"id": "e1", "name": "Staging", "uid": "1-e1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = client_for(&server)
        .replace(
            ResourceType::Environment,
            "1-e1",
            &ResourceScope::default(),
            json!({"name": "Staging", "values": []}),
        )
        .await
        .unwrap();
    assert_eq!(id, "1-e1");
}

#[tokio::test]
async fn test_name_resolver_falls_back_when_listing_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mocks"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resolver = client_for(&server)
        .name_resolver(ResourceType::Mock, &ResourceScope::default())
        .await;
    assert_eq!(resolver.resolve("my-mock"), "my-mock");
}

#[tokio::test]
async fn test_user_is_fetched_from_me() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"id": 12345}})))
        .mount(&server)
        .await;

    let user = client_for(&server).user().await.unwrap();
    assert_eq!(user, json!({"id": 12345}));
}
