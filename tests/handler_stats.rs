mod common;

use axum_test::TestServer;
use common::TestContext;
use hotlink::domain::repositories::LinkRepository;

#[tokio::test]
async fn test_stats_for_new_link() {
    let ctx = TestContext::new();
    ctx.links.seed("abc", "https://example.com", Some(3), None);
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server.get("/links/abc/stats").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["short_code"], "abc");
    assert_eq!(json["original_url"], "https://example.com");
    assert_eq!(json["owner_id"], 3);
    assert_eq!(json["visits"], 0);
    assert!(json["last_visited"].is_null());
    assert_eq!(json["popularity"], 0);
    assert!(json["created_at"].is_string());
}

#[tokio::test]
async fn test_stats_reports_popularity_and_visits() {
    let mut ctx = TestContext::new();
    ctx.links.seed("abc", "https://example.com", None, None);
    let server = TestServer::new(ctx.app()).unwrap();

    for _ in 0..2 {
        server.get("/links/abc").await;
    }

    // Apply the queued visits the way the background worker would.
    while let Ok(event) = ctx.visits.try_recv() {
        ctx.links
            .record_visit(&event.short_code, event.visited_at)
            .await
            .unwrap();
    }

    let json = server
        .get("/links/abc/stats")
        .await
        .json::<serde_json::Value>();

    assert_eq!(json["popularity"], 2);
    assert_eq!(json["visits"], 2);
    assert!(json["last_visited"].is_string());
}

#[tokio::test]
async fn test_stats_not_found() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server.get("/links/nope/stats").await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_search_by_original_url() {
    let ctx = TestContext::new();
    ctx.links.seed("first", "https://example.com/page", None, None);
    ctx.links.seed("second", "https://example.com/page", None, None);
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server
        .get("/links/url/search")
        .add_query_param("original_url", "https://example.com/page")
        .await;

    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "short_code": "first" }));
}

#[tokio::test]
async fn test_search_is_exact_match() {
    let ctx = TestContext::new();
    ctx.links.seed("abc", "https://example.com/page", None, None);
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server
        .get("/links/url/search")
        .add_query_param("original_url", "https://example.com/page/")
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_health_ok() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert_eq!(json["checks"]["visit_queue"]["status"], "ok");
}

#[tokio::test]
async fn test_health_degraded_when_store_down() {
    let ctx = TestContext::new();
    ctx.links.set_offline(true);
    let server = TestServer::new(ctx.app()).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
}
