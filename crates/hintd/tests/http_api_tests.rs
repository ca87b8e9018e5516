//! HTTP API tests - drive the full router with fake store and generator.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use hint_common::{
    patterns::hint_for, FallbackMatcher, FixedRandom, GenerationFailure, HintRecord,
    ServerConfig, KEYWORD_TABLE, PATTERN_TABLE,
};
use hintd::server::{router, AppState};
use hintd::{FakeGenerator, FakeHintStore, HintResolver};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(store: Arc<FakeHintStore>, generator: Arc<FakeGenerator>) -> Router {
    let resolver = HintResolver::new(
        store,
        generator,
        FallbackMatcher::new(Arc::new(FixedRandom(0))),
    );
    router(AppState::new(resolver), &ServerConfig::default())
}

async fn post_json(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/hint")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn http_500() -> GenerationFailure {
    GenerationFailure::Http {
        status: 500,
        body: "internal".to_string(),
    }
}

// ============================================================================
// POST /api/hint
// ============================================================================

#[tokio::test]
async fn test_two_sum_api_500_returns_fallback() {
    let store = Arc::new(FakeHintStore::new());
    let generator = Arc::new(FakeGenerator::always_error(http_500()));

    let (status, body) = post_json(
        app(store, generator.clone()),
        r#"{"questionTitle": "Two Sum"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["hint"], hint_for(PATTERN_TABLE, "two sum").unwrap());
    assert_eq!(
        body["message"],
        "AI service temporarily unavailable, using pattern-based hint"
    );
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test]
async fn test_two_sum_stored_returns_database_without_generation() {
    let store = Arc::new(FakeHintStore::with_records(vec![HintRecord::new(
        "Two Sum",
        "Stored: think about complements.",
    )]));
    let generator = Arc::new(FakeGenerator::always_ok("generated"));

    let (status, body) = post_json(
        app(store, generator.clone()),
        r#"{"questionTitle": "Two Sum"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "hint": "Stored: think about complements.", "source": "database" })
    );
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_generated_hint_response_shape() {
    let store = Arc::new(FakeHintStore::new());
    let generator = Arc::new(FakeGenerator::always_ok("Try two pointers."));

    let (status, body) = post_json(
        app(store.clone(), generator),
        r#"{"questionTitle": "Container With Most Water"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "hint": "Try two pointers.", "source": "generative" }));
    assert_eq!(store.records().len(), 1);
}

#[tokio::test]
async fn test_repeated_failures_are_deterministic_when_pattern_matches() {
    let store = Arc::new(FakeHintStore::new());
    let generator = Arc::new(FakeGenerator::always_error(GenerationFailure::Network(
        "connection refused".to_string(),
    )));
    let expected = hint_for(KEYWORD_TABLE, "anagram").unwrap();

    for _ in 0..5 {
        let (_, body) = post_json(
            app(store.clone(), generator.clone()),
            r#"{"questionTitle": "Valid Anagram"}"#,
        )
        .await;
        assert_eq!(body["source"], "fallback");
        assert_eq!(body["hint"], expected);
    }
}

#[tokio::test]
async fn test_store_failures_do_not_block_generation() {
    let store = Arc::new(FakeHintStore::new().failing_lookup().failing_insert());
    let generator = Arc::new(FakeGenerator::always_ok("generated"));

    let (status, body) = post_json(
        app(store.clone(), generator),
        r#"{"questionTitle": "Two Sum"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "generative");
    assert_eq!(store.insert_calls(), 1);
}

#[tokio::test]
async fn test_empty_and_missing_titles_rejected_before_chain() {
    let store = Arc::new(FakeHintStore::new());
    let generator = Arc::new(FakeGenerator::always_ok("generated"));

    for body in [r#"{"questionTitle": ""}"#, r#"{"questionTitle": "   "}"#, "{}"] {
        let (status, value) = post_json(app(store.clone(), generator.clone()), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(value["error"], "Question title is required");
    }

    assert_eq!(store.lookup_calls(), 0);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let store = Arc::new(FakeHintStore::new());
    let generator = Arc::new(FakeGenerator::always_ok("generated"));

    let (status, value) = post_json(app(store.clone(), generator), "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["error"].is_string());
    assert_eq!(store.lookup_calls(), 0);
}

#[tokio::test]
async fn test_panicking_store_returns_emergency() {
    let store = Arc::new(FakeHintStore::new().panicking_lookup());
    let generator = Arc::new(FakeGenerator::always_ok("generated"));

    let (status, body) = post_json(app(store, generator), r#"{"questionTitle": "Two Sum"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "emergency");
    assert_eq!(body["hint"], hint_common::GENERIC_HINTS[0]);
    assert_eq!(
        body["message"],
        "Service temporarily unavailable, using generic hint"
    );
}

// ============================================================================
// Other routes
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = get(
        app(Arc::new(FakeHintStore::new()), Arc::new(FakeGenerator::always_ok("x"))),
        "/health",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["service"], "hintd");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_generation_probe_endpoint() {
    let ok = get(
        app(
            Arc::new(FakeHintStore::new()),
            Arc::new(FakeGenerator::always_ok("Use a hash map.")),
        ),
        "/api/test-generation",
    )
    .await;
    assert_eq!(ok.0, StatusCode::OK);
    assert_eq!(ok.1["success"], true);
    assert_eq!(ok.1["hint"], "Use a hash map.");

    let failed = get(
        app(
            Arc::new(FakeHintStore::new()),
            Arc::new(FakeGenerator::always_error(http_500())),
        ),
        "/api/test-generation",
    )
    .await;
    assert_eq!(failed.0, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(failed.1["success"], false);
    assert!(failed.1["error"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_unknown_route_lists_available_routes() {
    let (status, body) = get(
        app(Arc::new(FakeHintStore::new()), Arc::new(FakeGenerator::always_ok("x"))),
        "/api/nope",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
    assert!(body["availableRoutes"]
        .as_array()
        .unwrap()
        .contains(&json!("POST /api/hint")));
}

#[tokio::test]
async fn test_cors_preflight_allows_extension_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/hint")
        .header(header::ORIGIN, "chrome-extension://abcdefg")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app(Arc::new(FakeHintStore::new()), Arc::new(FakeGenerator::always_ok("x")))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "chrome-extension://abcdefg"
    );
}
