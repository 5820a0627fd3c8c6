//! HTTP middleware for API layer.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};

const UNMATCHED_PATH: &str = "unmatched";

/// Records request count and latency per route template.
///
/// Labels use the matched route (`/tasks/{id}`) rather than the raw path so
/// ids do not blow up label cardinality.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = route_label(request.extensions().get::<MatchedPath>());

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    let elapsed = started.elapsed().as_secs_f64();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(elapsed);

    response
}

fn route_label(matched: Option<&MatchedPath>) -> String {
    matched.map_or_else(|| UNMATCHED_PATH.to_string(), |p| p.as_str().to_string())
}
