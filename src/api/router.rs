//! HTTP routing configuration with request tracing and OpenAPI documentation.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{HeaderName, Request, StatusCode},
    middleware,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::app::AppState;

use super::handlers::{
    ApiDoc, create_task_handler, favicon_handler, get_task_handler, health_check_handler,
    index_handler, list_tasks_handler, liveness_handler, metrics_handler, not_found_handler,
    patch_task_handler, readiness_handler, remove_task_handler,
};
use super::middleware::track_metrics;

const REQUEST_ID_HEADER: &str = "x-request-id";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Path of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/doc";
/// Path of the interactive API reference.
pub const REFERENCE_PATH: &str = "/reference";

/// Create the application router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let http_layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ));

    // Task routes
    let task_routes = Router::new()
        .route("/", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/{id}",
            get(get_task_handler)
                .patch(patch_task_handler)
                .delete(remove_task_handler),
        );

    // Health routes
    let health_routes = Router::new()
        .route("/", get(health_check_handler))
        .route("/live", get(liveness_handler))
        .route("/ready", get(readiness_handler));

    Router::new()
        .route("/", get(index_handler))
        .route("/favicon.ico", get(favicon_handler))
        .route("/metrics", get(metrics_handler))
        .nest("/tasks", task_routes)
        .nest("/health", health_routes)
        .merge(SwaggerUi::new(REFERENCE_PATH).url(OPENAPI_PATH, ApiDoc::openapi()))
        .fallback(not_found_handler)
        .layer(middleware::from_fn(track_metrics))
        .layer(http_layers)
        .with_state(app_state)
}
