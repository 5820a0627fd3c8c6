//! HTTP request handlers with OpenAPI documentation.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::error;
use utoipa::OpenApi;

use crate::app::AppState;
use crate::domain::{
    AppError, CreateTaskRequest, DatabaseError, HealthResponse, HealthStatus, MessageResponse,
    PatchTaskRequest, Task, ValidationErrorBody, ValidationErrorResponse, ValidationIssue,
};

use super::extractors::{JsonBody, TaskIdParam};

const NOT_FOUND_MESSAGE: &str = "Not Found";

const FAVICON_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"><text y=".9em" font-size="90">📝</text></svg>"#;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tasks API",
        version = "0.1.0",
        description = "CRUD API for tasks backed by SQLite",
        license(
            name = "MIT"
        )
    ),
    paths(
        index_handler,
        list_tasks_handler,
        create_task_handler,
        get_task_handler,
        patch_task_handler,
        remove_task_handler,
        health_check_handler,
        liveness_handler,
        readiness_handler,
    ),
    components(
        schemas(
            Task,
            CreateTaskRequest,
            PatchTaskRequest,
            ValidationIssue,
            ValidationErrorBody,
            ValidationErrorResponse,
            MessageResponse,
            HealthResponse,
            HealthStatus,
        )
    ),
    tags(
        (name = "Index", description = "API index"),
        (name = "Tasks", description = "Task management endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// API index
#[utoipa::path(
    get,
    path = "/",
    tag = "Index",
    responses(
        (status = 200, description = "Tasks API index", body = MessageResponse)
    )
)]
pub async fn index_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Tasks API"))
}

/// List all tasks
#[utoipa::path(
    get,
    path = "/tasks",
    tag = "Tasks",
    responses(
        (status = 200, description = "The list of tasks", body = Vec<Task>),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn list_tasks_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = state.service.list_tasks().await?;
    Ok(Json(tasks))
}

/// Create a task
#[utoipa::path(
    post,
    path = "/tasks",
    tag = "Tasks",
    request_body(content = CreateTaskRequest, description = "The task to create"),
    responses(
        (status = 200, description = "The created task", body = Task),
        (status = 400, description = "Malformed JSON body", body = MessageResponse),
        (status = 422, description = "The validation error(s)", body = ValidationErrorResponse)
    )
)]
pub async fn create_task_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<CreateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let task = state.service.create_task(&payload).await?;
    Ok(Json(task))
}

/// Get a single task by id
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "Tasks",
    params(
        ("id" = i64, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "The requested task", body = Task),
        (status = 404, description = "Task not found", body = MessageResponse),
        (status = 422, description = "Invalid id error", body = ValidationErrorResponse)
    )
)]
pub async fn get_task_handler(
    State(state): State<Arc<AppState>>,
    TaskIdParam(id): TaskIdParam,
) -> Result<Json<Task>, AppError> {
    let task = state
        .service
        .get_task(id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("Task {id}")))?;
    Ok(Json(task))
}

/// Partially update a task
#[utoipa::path(
    patch,
    path = "/tasks/{id}",
    tag = "Tasks",
    params(
        ("id" = i64, Path, description = "Task id")
    ),
    request_body(content = PatchTaskRequest, description = "The task updates"),
    responses(
        (status = 200, description = "The updated task", body = Task),
        (status = 400, description = "Malformed JSON body", body = MessageResponse),
        (status = 404, description = "Task not found", body = MessageResponse),
        (status = 422, description = "The validation error(s)", body = ValidationErrorResponse)
    )
)]
pub async fn patch_task_handler(
    State(state): State<Arc<AppState>>,
    TaskIdParam(id): TaskIdParam,
    JsonBody(payload): JsonBody<PatchTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let task = state.service.update_task(id, payload).await?;
    Ok(Json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = "Tasks",
    params(
        ("id" = i64, Path, description = "Task id")
    ),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found", body = MessageResponse),
        (status = 422, description = "Invalid id error", body = ValidationErrorResponse)
    )
)]
pub async fn remove_task_handler(
    State(state): State<Arc<AppState>>,
    TaskIdParam(id): TaskIdParam,
) -> Result<StatusCode, AppError> {
    state.service.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Detailed health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Health status", body = HealthResponse)
    )
)]
pub async fn health_check_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(state.service.health_check().await)
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Application is alive")
    )
)]
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Readiness check
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Application is ready to serve traffic"),
        (status = 503, description = "Application is not ready")
    )
)]
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.service.health_check().await.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Prometheus scrape endpoint
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(MessageResponse::new(NOT_FOUND_MESSAGE)),
        )
            .into_response(),
    }
}

/// SVG favicon
pub async fn favicon_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], FAVICON_SVG)
}

/// Fallback for unmatched routes.
pub async fn not_found_handler(uri: Uri) -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(MessageResponse::new(format!(
            "{NOT_FOUND_MESSAGE} - {}",
            uri.path()
        ))),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, error_type) = match self {
            AppError::Validation(validation) => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ValidationErrorResponse::new(validation.issues)),
                )
                    .into_response();
            }
            AppError::Database(DatabaseError::NotFound(_)) => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(MessageResponse::new(NOT_FOUND_MESSAGE)),
                )
                    .into_response();
            }
            AppError::Database(DatabaseError::Connection(_) | DatabaseError::PoolExhausted(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "database_unavailable")
            }
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            error!(error_type = %error_type, message = %message, "Server error");
        }

        (status, Json(MessageResponse::new(message))).into_response()
    }
}
