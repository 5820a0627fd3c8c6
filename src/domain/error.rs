//! Application error types with proper error chaining.

use thiserror::Error;

use super::types::ValidationIssue;

/// Issue code for a request whose patch body changes nothing.
pub const INVALID_UPDATES_CODE: &str = "invalid_updates";
/// Message paired with [`INVALID_UPDATES_CODE`].
pub const NO_UPDATES_MESSAGE: &str = "No updates provided";
/// Message for a path id that is not a number.
pub const EXPECTED_NUMBER_MESSAGE: &str = "Expected number, received nan";
/// Message for a missing required field.
pub const REQUIRED_MESSAGE: &str = "Required";

#[derive(Error, Debug, Clone)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Query execution failed: {0}")]
    Query(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Pool exhausted: {0}")]
    PoolExhausted(String),
    #[error("Migration failed: {0}")]
    Migration(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ConfigError>),
}

/// A request failed validation; carries every issue found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation failed: {}", .issues.iter().map(|i| i.message.as_str()).collect::<Vec<_>>().join(", "))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn single(code: &str, path: &[&str], message: impl Into<String>) -> Self {
        Self::new(vec![ValidationIssue::new(code, path, message)])
    }

    /// The path parameter `id` did not parse as a number.
    pub fn invalid_id() -> Self {
        Self::single("invalid_type", &["id"], EXPECTED_NUMBER_MESSAGE)
    }

    /// A patch body without any recognised field.
    pub fn no_updates() -> Self {
        Self::single(INVALID_UPDATES_CODE, &[], NO_UPDATES_MESSAGE)
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut issues = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            let field = field.to_string();
            for error in field_errors {
                let (code, message) = describe_validator_error(error);
                issues.push(ValidationIssue {
                    code,
                    path: vec![field.clone()],
                    message,
                });
            }
        }
        // field_errors() is a HashMap
        issues.sort_by(|a, b| a.path.cmp(&b.path));
        Self { issues }
    }
}

fn describe_validator_error(error: &validator::ValidationError) -> (String, String) {
    match error.code.as_ref() {
        "required" => ("invalid_type".to_string(), REQUIRED_MESSAGE.to_string()),
        "length" => {
            let bound = |key: &str| error.params.get(key).and_then(serde_json::Value::as_u64);
            let actual = error
                .params
                .get("value")
                .and_then(serde_json::Value::as_str)
                .map(|s| s.chars().count() as u64);
            match (bound("min"), bound("max"), actual) {
                (Some(min), _, Some(len)) if len < min => (
                    "too_small".to_string(),
                    format!("String must contain at least {min} character(s)"),
                ),
                (_, Some(max), _) => (
                    "too_big".to_string(),
                    format!("String must contain at most {max} character(s)"),
                ),
                (Some(min), None, _) => (
                    "too_small".to_string(),
                    format!("String must contain at least {min} character(s)"),
                ),
                _ => ("invalid_string".to_string(), "Invalid length".to_string()),
            }
        }
        other => (
            other.to_string(),
            error
                .message
                .as_ref()
                .map_or_else(|| format!("Invalid value ({other})"), ToString::to_string),
        ),
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(ValidationError::from(err))
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Row not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted("Pool timed out".to_string()),
            sqlx::Error::PoolClosed => DatabaseError::Connection("Pool closed".to_string()),
            sqlx::Error::Io(e) => DatabaseError::Connection(e.to_string()),
            sqlx::Error::Database(db_err) => DatabaseError::Query(db_err.message().to_string()),
            _ => DatabaseError::Query(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(DatabaseError::from(err))
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(DatabaseError::Migration(err.to_string()))
    }
}
