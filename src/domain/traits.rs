//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::AppError;
use super::types::{NewTask, Task, TaskChanges, TaskId};

/// Persistence contract for tasks.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Check database connectivity
    async fn health_check(&self) -> Result<(), AppError>;

    /// List every task ordered by id
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError>;

    /// Insert a new task and return the stored row
    async fn create_task(&self, data: &NewTask) -> Result<Task, AppError>;

    /// Get a single task by id
    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, AppError>;

    /// Apply changes to a task and refresh `updated_at`.
    ///
    /// Returns `None` when no row has the given id.
    async fn update_task(&self, id: TaskId, changes: &TaskChanges)
    -> Result<Option<Task>, AppError>;

    /// Delete a task; `false` when no row has the given id
    async fn delete_task(&self, id: TaskId) -> Result<bool, AppError>;
}
