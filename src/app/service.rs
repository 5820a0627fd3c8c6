//! Application service layer.
//!
//! This module contains the task use cases: validation of incoming payloads
//! followed by a single repository call each.

use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::{
    AppError, CreateTaskRequest, DatabaseError, HealthResponse, HealthStatus, NewTask,
    PatchTaskRequest, Task, TaskChanges, TaskId, TaskRepository, ValidationError,
};

/// Application service containing the task use cases.
///
/// Holds the repository behind its trait so handlers can be exercised
/// against the in-memory mock as well as SQLite.
///
/// # Example
///
/// ```ignore
/// let repository = Arc::new(SqliteClient::with_defaults("sqlite::memory:").await?);
/// let service = TaskService::new(repository);
///
/// let task = service.create_task(&CreateTaskRequest::new("Learn Rust")).await?;
/// ```
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    #[must_use]
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// Lists every task.
    #[instrument(skip(self))]
    pub async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        self.repository.list_tasks().await
    }

    /// Validates and inserts a new task.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when the name is missing, empty or too
    /// long, and `AppError::Database` when the insert fails.
    #[instrument(skip(self, request))]
    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, AppError> {
        request.validate().map_err(|e| {
            warn!(error = %e, "Validation failed for create task request");
            AppError::Validation(ValidationError::from(e))
        })?;

        let new_task = NewTask {
            name: request.name.clone().unwrap_or_default(),
            done: request.done.unwrap_or(false),
        };

        let task = self.repository.create_task(&new_task).await?;
        info!(task_id = task.id, "Task created");
        Ok(task)
    }

    /// Gets a task by id.
    #[instrument(skip(self))]
    pub async fn get_task(&self, id: TaskId) -> Result<Option<Task>, AppError> {
        self.repository.get_task(id).await
    }

    /// Applies a partial update.
    ///
    /// Field rules are checked before the empty-body rule, so `{"name": ""}`
    /// reports the name rather than a missing update.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for invalid or empty bodies and
    /// `DatabaseError::NotFound` when the task does not exist.
    #[instrument(skip(self, request))]
    pub async fn update_task(
        &self,
        id: TaskId,
        request: PatchTaskRequest,
    ) -> Result<Task, AppError> {
        request.validate().map_err(|e| {
            warn!(error = %e, "Validation failed for patch task request");
            AppError::Validation(ValidationError::from(e))
        })?;

        if request.is_empty() {
            return Err(ValidationError::no_updates().into());
        }

        let changes = TaskChanges::from(request);
        let task = self
            .repository
            .update_task(id, &changes)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Task {id}")))?;
        info!(task_id = task.id, "Task updated");
        Ok(task)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when the task does not exist.
    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: TaskId) -> Result<(), AppError> {
        if !self.repository.delete_task(id).await? {
            return Err(DatabaseError::NotFound(format!("Task {id}")).into());
        }
        info!(task_id = id, "Task deleted");
        Ok(())
    }

    /// Reports database reachability.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> HealthResponse {
        let database = match self.repository.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = ?e, "Database health check failed");
                HealthStatus::Unhealthy
            }
        };
        HealthResponse::new(database)
    }
}
