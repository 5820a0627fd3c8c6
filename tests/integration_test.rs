//! Integration tests for the API.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use tasks_api::api::create_router;
use tasks_api::app::AppState;
use tasks_api::domain::{
    CreateTaskRequest, HealthResponse, HealthStatus, MessageResponse, Task,
    ValidationErrorResponse,
};
use tasks_api::infra::observability::init_metrics_handle;
use tasks_api::test_utils::MockTaskRepository;

fn create_test_state() -> Arc<AppState> {
    let db = Arc::new(MockTaskRepository::new());
    Arc::new(AppState::new(db))
}

fn create_state_with(db: Arc<MockTaskRepository>) -> Arc<AppState> {
    Arc::new(AppState::new(db))
}

#[tokio::test]
async fn test_create_task_success() {
    let state = create_test_state();
    let router = create_router(state);

    let payload = CreateTaskRequest::new("Test Task").with_done(true);

    let request = Request::builder()
        .method("POST")
        .uri("/tasks")
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&payload).unwrap()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let task: Task = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(task.name, "Test Task");
    assert!(task.done);
}

#[tokio::test]
async fn test_create_task_validation_error() {
    let state = create_test_state();
    let router = create_router(state);

    let payload = CreateTaskRequest::new("");

    let request = Request::builder()
        .method("POST")
        .uri("/tasks")
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&payload).unwrap()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: ValidationErrorResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert!(!body.success);
    assert_eq!(body.error.issues[0].code, "too_small");
    assert_eq!(
        body.error.issues[0].message,
        "String must contain at least 1 character(s)"
    );
}

#[tokio::test]
async fn test_create_task_does_not_hit_repository_when_invalid() {
    let db = Arc::new(MockTaskRepository::new());
    let router = create_router(create_state_with(Arc::clone(&db)));

    let request = Request::builder()
        .method("POST")
        .uri("/tasks")
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"done": true}"#))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(db.call_count(), 0);
}

#[tokio::test]
async fn test_create_task_malformed_json() {
    let state = create_test_state();
    let router = create_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/tasks")
        .header("Content-Type", "application/json")
        .body(Body::from("{ invalid json }"))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: MessageResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert!(!body.message.is_empty());
}

#[tokio::test]
async fn test_create_task_missing_content_type() {
    let state = create_test_state();
    let router = create_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/tasks")
        .body(Body::from(r#"{"name": "x"}"#))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_tasks_empty() {
    let state = create_test_state();
    let router = create_router(state);

    let request = Request::builder()
        .method("GET")
        .uri("/tasks")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let tasks: Vec<Task> = serde_json::from_slice(&body_bytes).unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_list_tasks_database_failure() {
    let db = Arc::new(MockTaskRepository::failing("disk I/O error"));
    let router = create_router(create_state_with(db));

    let request = Request::builder()
        .method("GET")
        .uri("/tasks")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: MessageResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert!(body.message.contains("disk I/O error"));
}

#[tokio::test]
async fn test_patch_task_missing_row_checks_body_first() {
    let db = Arc::new(MockTaskRepository::new());
    let router = create_router(create_state_with(Arc::clone(&db)));

    let request = Request::builder()
        .method("PATCH")
        .uri("/tasks/42")
        .header("Content-Type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(db.call_count(), 0);
}

#[tokio::test]
async fn test_patch_task_rejects_non_object_body() {
    let state = create_test_state();
    let router = create_router(state);

    let request = Request::builder()
        .method("PATCH")
        .uri("/tasks/1")
        .header("Content-Type", "application/json")
        .body(Body::from("[true]"))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: ValidationErrorResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body.error.issues[0].code, "invalid_type");
    assert!(body.error.issues[0].path.is_empty());
}

#[tokio::test]
async fn test_health_check_healthy() {
    let state = create_test_state();
    let router = create_router(state);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let health: HealthResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(health.status, HealthStatus::Healthy);
    assert_eq!(health.database, HealthStatus::Healthy);
}

#[tokio::test]
async fn test_health_check_unhealthy_database() {
    let db = Arc::new(MockTaskRepository::new());
    db.set_healthy(false);
    let router = create_router(create_state_with(db));

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let health: HealthResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(health.status, HealthStatus::Unhealthy);
    assert_eq!(health.database, HealthStatus::Unhealthy);
}

#[tokio::test]
async fn test_readiness_unavailable_when_database_down() {
    let db = Arc::new(MockTaskRepository::new());
    db.set_healthy(false);
    let router = create_router(create_state_with(db));

    let request = Request::builder()
        .method("GET")
        .uri("/health/ready")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_index_message() {
    let state = create_test_state();
    let router = create_router(state);

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: MessageResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body.message, "Tasks API");
}

#[tokio::test]
async fn test_favicon_is_svg() {
    let state = create_test_state();
    let router = create_router(state);

    let request = Request::builder()
        .uri("/favicon.ico")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let svg = String::from_utf8(body_bytes.to_vec()).unwrap();
    assert!(svg.contains("📝"));
}

#[tokio::test]
async fn test_unknown_route_returns_not_found_message() {
    let state = create_test_state();
    let router = create_router(state);

    let request = Request::builder()
        .uri("/projects")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: MessageResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body.message, "Not Found - /projects");
}

#[tokio::test]
async fn test_openapi_document_lists_task_routes() {
    let state = create_test_state();
    let router = create_router(state);

    let request = Request::builder().uri("/doc").body(Body::empty()).unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let doc: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
    assert!(doc["openapi"].as_str().unwrap().starts_with("3."));
    assert!(doc["paths"]["/tasks"]["get"].is_object());
    assert!(doc["paths"]["/tasks"]["post"].is_object());
    assert!(doc["paths"]["/tasks/{id}"]["patch"].is_object());
    assert!(doc["paths"]["/tasks/{id}"]["delete"].is_object());
    assert_eq!(doc["paths"]["/tasks"]["get"]["tags"][0], "Tasks");
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let state = create_test_state();
    let router = create_router(state);

    let request = Request::builder().uri("/tasks").body(Body::empty()).unwrap();

    let response = router.oneshot(request).await.unwrap();
    let request_id = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(request_id.len(), 36);
}

#[tokio::test]
async fn test_create_task_wrong_type_reports_field_path() {
    let state = create_test_state();
    let router = create_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/tasks")
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"name": 5}"#))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: ValidationErrorResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body.error.issues[0].code, "invalid_type");
    assert_eq!(body.error.issues[0].path, vec!["name".to_string()]);
}

#[tokio::test]
async fn test_fractional_or_oversized_id_is_not_found() {
    let state = create_test_state();

    for uri in ["/tasks/1.5", "/tasks/99999999999999999999"] {
        let router = create_router(Arc::clone(&state));
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");

        let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: MessageResponse = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body.message, "Not Found");
    }
}

#[tokio::test]
async fn test_metrics_endpoint_renders_request_counter() {
    let handle = init_metrics_handle().expect("recorder should install once per process");
    let state = Arc::new(
        AppState::new(Arc::new(MockTaskRepository::new())).with_metrics(Some(handle)),
    );

    let request = Request::builder().uri("/tasks").body(Body::empty()).unwrap();
    let response = create_router(Arc::clone(&state)).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = create_router(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body_bytes.to_vec()).unwrap();
    assert!(text.contains("http_requests_total"));
    assert!(text.contains(r#"path="/tasks""#));
}
