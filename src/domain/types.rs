use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Primary key of a task row.
pub type TaskId = i64;

/// Core domain entity: a to-do item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[schema(example = 1)]
    pub id: TaskId,
    #[schema(example = "Learn Rust")]
    pub name: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(id: TaskId, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            done: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }
}

/// Request payload for creating a task.
///
/// `name` is optional at the type level so that a missing name is reported
/// as a validation issue instead of a body parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[validate(required, length(min = 1, max = 500))]
    #[schema(example = "Learn Rust", min_length = 1, max_length = 500)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(default = false)]
    pub done: Option<bool>,
}

impl CreateTaskRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            done: None,
        }
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = Some(done);
        self
    }
}

/// Request payload for a partial task update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PatchTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 500))]
    #[schema(min_length = 1, max_length = 500)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

impl PatchTaskRequest {
    /// True when the body carries no field to change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.done.is_none()
    }
}

/// A validated task ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub done: bool,
}

/// A validated, non-empty set of changes for an existing task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub name: Option<String>,
    pub done: Option<bool>,
}

impl From<PatchTaskRequest> for TaskChanges {
    fn from(request: PatchTaskRequest) -> Self {
        Self {
            name: request.name,
            done: request.done,
        }
    }
}

/// One entry of a validation error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ValidationIssue {
    #[schema(example = "invalid_type")]
    pub code: String,
    #[schema(example = json!(["name"]))]
    pub path: Vec<String>,
    #[schema(example = "Required")]
    pub message: String,
}

impl ValidationIssue {
    pub fn new(code: impl Into<String>, path: &[&str], message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            path: path.iter().map(|s| (*s).to_string()).collect(),
            message: message.into(),
        }
    }
}

/// Body of a 422 response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub success: bool,
    pub error: ValidationErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorBody {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationErrorResponse {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self {
            success: false,
            error: ValidationErrorBody { issues },
        }
    }
}

/// Plain message body used for 404s, index and generic errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Not Found")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check status for services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health check response for the application.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub database: HealthStatus,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn new(database: HealthStatus) -> Self {
        Self {
            status: database.clone(),
            database,
            timestamp: Utc::now(),
        }
    }
}
