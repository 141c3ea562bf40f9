mod common;

use axum_test::TestServer;
use chrono::{TimeDelta, Utc};
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_shorten_anonymous() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server
        .post("/links/shorten")
        .json(&json!({ "original_url": "https://example.com" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    let code = json["short_code"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert_eq!(json["original_url"], "https://example.com");
    assert!(json["owner_id"].is_null());
    assert!(ctx.links.find(code).is_some());
}

#[tokio::test]
async fn test_shorten_with_token_records_owner() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server
        .post("/links/shorten")
        .add_header("Authorization", ctx.bearer(42))
        .json(&json!({ "original_url": "https://example.com", "custom_alias": "mine" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["short_code"], "mine");
    assert_eq!(json["owner_id"], 42);
}

#[tokio::test]
async fn test_shorten_with_unknown_token_is_anonymous() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server
        .post("/links/shorten")
        .add_header("Authorization", "Bearer not-a-real-token")
        .json(&json!({ "original_url": "https://example.com" }))
        .await;

    response.assert_status_ok();
    assert!(response.json::<serde_json::Value>()["owner_id"].is_null());
}

#[tokio::test]
async fn test_shorten_alias_taken() {
    let ctx = TestContext::new();
    ctx.links.seed("taken", "https://other.com", None, None);
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server
        .post("/links/shorten")
        .json(&json!({ "original_url": "https://example.com", "custom_alias": "taken" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "conflict");
    assert_eq!(
        ctx.links.find("taken").unwrap().original_url,
        "https://other.com"
    );
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server
        .post("/links/shorten")
        .json(&json!({ "original_url": "not-a-valid-url" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_shorten_rejects_reserved_alias() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server
        .post("/links/shorten")
        .json(&json!({ "original_url": "https://example.com", "custom_alias": "shorten" }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_shorten_with_expiry_then_redirect() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.app()).unwrap();
    let expires_at = Utc::now() + TimeDelta::hours(1);

    let response = server
        .post("/links/shorten")
        .json(&json!({
            "original_url": "https://example.com/timed",
            "custom_alias": "timed",
            "expires_at": expires_at,
        }))
        .await;

    response.assert_status_ok();
    assert!(response.json::<serde_json::Value>()["expires_at"].is_string());

    let redirect = server.get("/links/timed").await;
    assert_eq!(redirect.status_code(), 307);
}

#[tokio::test]
async fn test_shorten_rejects_past_expiry() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server
        .post("/links/shorten")
        .json(&json!({
            "original_url": "https://example.com",
            "expires_at": Utc::now() - TimeDelta::minutes(5),
        }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_shorten_store_unavailable() {
    let ctx = TestContext::new();
    ctx.links.set_offline(true);
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server
        .post("/links/shorten")
        .json(&json!({ "original_url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn test_shorten_rejects_control_characters() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server
        .post("/links/shorten")
        .json(&json!({
            "original_url": "https://example.com/a\nb",
            "custom_alias": "ctrl1",
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(ctx.links.find("ctrl1").is_none());
}

#[tokio::test]
async fn test_shorten_from_query_parameters() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server
        .post("/links/shorten")
        .add_query_param("original_url", "https://example.com/from-query")
        .add_query_param("custom_alias", "fromquery")
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["short_code"], "fromquery");
    assert_eq!(json["original_url"], "https://example.com/from-query");
}

#[tokio::test]
async fn test_shorten_malformed_json_uses_error_envelope() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server
        .post("/links/shorten")
        .text("{not json")
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), 400);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_shorten_without_url_uses_error_envelope() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server.post("/links/shorten").await;

    assert_eq!(response.status_code(), 400);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}
