use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use commerce_agent_sdk::{app, load, method_routes_with_limit, AppState, Context, MockTransport};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn router(mock: &Arc<MockTransport>, default_context: Context) -> Router {
    let state = AppState::new(mock.clone(), Arc::new(load().unwrap()), "shop", default_context);
    app(state)
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

fn post(uri: &str, params: &Value, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(params.to_string())).unwrap()
}

#[tokio::test]
async fn test_health() {
    let mock = Arc::new(MockTransport::new());
    let (status, body) = send(
        router(&mock, Context::default()),
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_list_methods_follows_headers() {
    let mock = Arc::new(MockTransport::new());
    let (status, body) = send(
        router(&mock, Context::default()),
        Request::builder()
            .uri("/api/v1/methods")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["read_category", "read_product"]));

    let (_, body) = send(
        router(&mock, Context::default()),
        Request::builder()
            .uri("/api/v1/methods")
            .header("X-Admin", "true")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(body["meta"]["count"], 89);
}

#[tokio::test]
async fn test_invoke_read_returns_platform_body() {
    let mock = Arc::new(MockTransport::new());
    mock.on_get("/shop/inventory/x", json!({"id": "x", "version": 1}));
    let request = post("/api/v1/methods/read_inventory", &json!({"id": "x"}), &[]);
    let (status, body) = send(router(&mock, Context::admin()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "x");
    assert_eq!(body["meta"]["method"], "read_inventory");
}

#[tokio::test]
async fn test_invoke_create_answers_created() {
    let mock = Arc::new(MockTransport::new());
    mock.on_post("/shop/zones", json!({"id": "zone-1", "version": 1}));
    let request = post(
        "/api/v1/methods/create_zone",
        &json!({"name": "Europe"}),
        &[("X-Admin", "true")],
    );
    let (status, body) = send(router(&mock, Context::default()), request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], "zone-1");
}

#[tokio::test]
async fn test_malformed_body_is_rejected_before_any_call() {
    let mock = Arc::new(MockTransport::new());
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/methods/read_inventory")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"id": "x""#))
        .unwrap();
    let (status, body) = send(router(&mock, Context::admin()), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_non_json_body_is_rejected() {
    let mock = Arc::new(MockTransport::new());
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/methods/read_inventory")
        .header("content-type", "text/plain")
        .body(Body::from("id=x"))
        .unwrap();
    let (status, _) = send(router(&mock, Context::admin()), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_oversized_body_is_refused() {
    let mock = Arc::new(MockTransport::new());
    let state = AppState::new(mock.clone(), Arc::new(load().unwrap()), "shop", Context::admin());
    let request = post(
        "/methods/create_zone",
        &json!({"name": "x".repeat(256)}),
        &[],
    );
    let (status, _) = send(method_routes_with_limit(state, 64), request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_empty_body_runs_default_query() {
    let mock = Arc::new(MockTransport::new());
    mock.on_get("/shop/inventory", json!({"results": [], "count": 0}));
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/methods/read_inventory")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(router(&mock, Context::admin()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mock.requests()[0].query_values("limit"), vec!["10"]);
}

#[tokio::test]
async fn test_unknown_method_is_not_found() {
    let mock = Arc::new(MockTransport::new());
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/methods/delete_cart")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(router(&mock, Context::admin()), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "invalid_method");
    assert_eq!(body["error"]["message"], "Invalid method delete_cart");
}

#[tokio::test]
async fn test_ownership_failure_is_forbidden() {
    let mock = Arc::new(MockTransport::new());
    mock.on_get("/shop/orders/o-1", json!({"id": "o-1", "version": 1, "customerId": "c-2"}));
    let request = post(
        "/api/v1/methods/read_order",
        &json!({"id": "o-1"}),
        &[("X-Customer-Id", "c-1")],
    );
    let (status, body) = send(router(&mock, Context::admin()), request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"]["message"],
        "Failed to read order: Order does not belong to customer c-1"
    );
}

#[tokio::test]
async fn test_remote_not_found_maps_to_404() {
    let mock = Arc::new(MockTransport::new());
    let request = post("/api/v1/methods/read_zone", &json!({"id": "missing"}), &[]);
    let (status, body) = send(router(&mock, Context::admin()), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_invalid_admin_header_is_rejected() {
    let mock = Arc::new(MockTransport::new());
    let request = Request::builder()
        .uri("/api/v1/methods")
        .header("X-Admin", "maybe")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(router(&mock, Context::default()), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
}
