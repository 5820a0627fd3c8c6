//! Domain layer containing core business types, traits, and error definitions.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AppError, ConfigError, DatabaseError, ValidationError};
pub use traits::TaskRepository;
pub use types::{
    CreateTaskRequest, HealthResponse, HealthStatus, MessageResponse, NewTask, PatchTaskRequest,
    Task, TaskChanges, TaskId, ValidationErrorBody, ValidationErrorResponse, ValidationIssue,
};
