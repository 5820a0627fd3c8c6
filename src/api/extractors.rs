//! Request extractors that report failures as validation issues.
//!
//! Axum's stock `Path` and `Json` extractors reject with plain-text bodies;
//! these wrap them so every client error comes back in the same JSON shape.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_path_to_error::Segment;

use crate::domain::{AppError, DatabaseError, TaskId, ValidationError, ValidationIssue};

/// Numeric `{id}` path parameter.
///
/// Non-numeric ids are a 422. Numbers that cannot be a row id (fractions,
/// values outside `i64`) are a 404, since no such task can exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskIdParam(pub TaskId);

impl<S> FromRequestParts<S> for TaskIdParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Internal(rejection.body_text()))?;

        match parse_task_id(&raw) {
            RawTaskId::Id(id) => Ok(Self(id)),
            // A number, but not one any row can have.
            RawTaskId::Unrepresentable => {
                Err(DatabaseError::NotFound(format!("Task {}", raw.trim())).into())
            }
            RawTaskId::NotANumber => Err(ValidationError::invalid_id().into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawTaskId {
    Id(TaskId),
    Unrepresentable,
    NotANumber,
}

fn parse_task_id(raw: &str) -> RawTaskId {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<TaskId>() {
        return RawTaskId::Id(id);
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => RawTaskId::Unrepresentable,
        _ => RawTaskId::NotANumber,
    }
}

/// JSON body extractor.
///
/// Syntax errors and a wrong content type are 400s; a body that is valid
/// JSON but the wrong shape is reported as an `invalid_type` issue pointing
/// at the offending field.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        if !value.is_object() {
            return Err(ValidationError::single(
                "invalid_type",
                &[],
                format!("Expected object, received {}", json_type_name(&value)),
            )
            .into());
        }

        serde_path_to_error::deserialize(value)
            .map(JsonBody)
            .map_err(|e| type_error(&e).into())
    }
}

/// Reports a deserialization failure at the field where it happened.
fn type_error(error: &serde_path_to_error::Error<serde_json::Error>) -> ValidationError {
    let path = error
        .path()
        .iter()
        .filter_map(|segment| match segment {
            Segment::Map { key } => Some(key.clone()),
            Segment::Seq { index } => Some(index.to_string()),
            Segment::Enum { variant } => Some(variant.clone()),
            Segment::Unknown => None,
        })
        .collect();

    ValidationError::new(vec![ValidationIssue {
        code: "invalid_type".to_string(),
        path,
        message: error.inner().to_string(),
    }])
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
