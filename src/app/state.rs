//! Application state management.
//!
//! This module provides the shared application state that is
//! accessible to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::domain::TaskRepository;
use crate::infra::observability::PrometheusHandle;

use super::service::TaskService;

/// Shared application state for the Axum web server.
///
/// All contained types are wrapped in `Arc` and implement `Send + Sync`,
/// making `AppState` safe to share across async tasks.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
///
/// let repository = Arc::new(SqliteClient::with_defaults(&database_url).await?);
/// let state = Arc::new(AppState::new(repository));
///
/// let router = create_router(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    /// The task use cases.
    pub service: Arc<TaskService>,

    /// Repository backing the service.
    pub repository: Arc<dyn TaskRepository>,

    /// Prometheus handle rendered at `/metrics`, when a recorder is installed.
    pub metrics: Option<Arc<PrometheusHandle>>,
}

impl AppState {
    /// Creates a new `AppState`, wiring a `TaskService` to the repository.
    #[must_use]
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        let service = Arc::new(TaskService::new(Arc::clone(&repository)));

        Self {
            service,
            repository,
            metrics: None,
        }
    }

    /// Attaches a Prometheus handle so `/metrics` can render it.
    #[must_use]
    pub fn with_metrics(mut self, handle: Option<Arc<PrometheusHandle>>) -> Self {
        self.metrics = handle;
        self
    }
}
