//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of domain traits
//! that can be configured to simulate various scenarios including
//! success, failure, and edge cases.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

use crate::domain::{AppError, DatabaseError, NewTask, Task, TaskChanges, TaskId, TaskRepository};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
    /// Simulated latency in milliseconds.
    pub latency_ms: Option<u64>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            latency_ms: None,
        }
    }

    /// Adds simulated latency.
    #[must_use]
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }
}

/// Mock task repository for testing.
///
/// Stores tasks in an ordered in-memory map, assigns ids like an
/// autoincrement column and supports configurable failure modes.
///
/// # Example
///
/// ```
/// use tasks_api::test_utils::{MockTaskRepository, mocks::MockConfig};
///
/// // Create a mock that succeeds
/// let mock = MockTaskRepository::new();
///
/// // Create a mock that fails
/// let failing_mock = MockTaskRepository::with_config(MockConfig::failure("DB error"));
/// ```
pub struct MockTaskRepository {
    storage: Mutex<BTreeMap<TaskId, Task>>,
    next_id: AtomicI64,
    config: MockConfig,
    call_count: AtomicU64,
    is_healthy: AtomicBool,
}

impl MockTaskRepository {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            storage: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            config,
            call_count: AtomicU64::new(0),
            is_healthy: AtomicBool::new(true),
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Gets the number of times any method was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Gets all stored tasks ordered by id.
    pub fn get_all_tasks(&self) -> Vec<Task> {
        self.storage.lock().unwrap().values().cloned().collect()
    }

    /// Clears all stored tasks.
    pub fn clear(&self) {
        self.storage.lock().unwrap().clear();
    }

    async fn begin_call(&self) -> Result<(), AppError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Some(ms) = self.config.latency_ms {
            tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
        }
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock database error".to_string());
            return Err(AppError::Database(DatabaseError::Query(msg)));
        }
        Ok(())
    }
}

impl Default for MockTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn health_check(&self) -> Result<(), AppError> {
        if !self.is_healthy.load(Ordering::Relaxed) {
            self.call_count.fetch_add(1, Ordering::Relaxed);
            return Err(AppError::Database(DatabaseError::Connection(
                "Mock database unhealthy".to_string(),
            )));
        }
        self.begin_call().await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        self.begin_call().await?;
        Ok(self.get_all_tasks())
    }

    async fn create_task(&self, data: &NewTask) -> Result<Task, AppError> {
        self.begin_call().await?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let task = Task::new(id, data.name.clone()).with_done(data.done);

        self.storage.lock().unwrap().insert(id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, AppError> {
        self.begin_call().await?;
        Ok(self.storage.lock().unwrap().get(&id).cloned())
    }

    async fn update_task(
        &self,
        id: TaskId,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, AppError> {
        self.begin_call().await?;

        let mut storage = self.storage.lock().unwrap();
        Ok(storage.get_mut(&id).map(|existing| {
            if let Some(name) = &changes.name {
                existing.name = name.clone();
            }
            if let Some(done) = changes.done {
                existing.done = done;
            }
            existing.updated_at = Utc::now();
            existing.clone()
        }))
    }

    async fn delete_task(&self, id: TaskId) -> Result<bool, AppError> {
        self.begin_call().await?;
        Ok(self.storage.lock().unwrap().remove(&id).is_some())
    }
}
