//! API error kinds and their HTTP representations.
//!
//! # Design
//! Three kinds of failure leave this service: `NotFound` and `Validation`
//! surface their messages directly to the caller; anything unexpected is
//! logged together with a generated trace id and replaced by a generic
//! message, so internals never reach the wire. The trace id in the response
//! body lets a caller quote the exact log entry when reporting a fault.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use todo_core::ErrorBody;
use uuid::Uuid;

use crate::store::StoreError;

/// A single failed field check. All rule messages are static, so the pair
/// borrows nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Validation outcome carrying every failing field at once.
#[derive(Debug)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    fn into_map(self) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for error in self.errors {
            map.entry(error.field.to_string())
                .or_default()
                .push(error.message.to_string());
        }
        map
    }
}

/// Everything a handler can fail with, mapped onto the wire in one place.
#[derive(Debug)]
pub enum ApiError {
    NotFound(i64),
    Validation(ValidationError),
    Fault(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Fault(other),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    message: format!("Todo with ID {id} not found"),
                    status_code: 404,
                    errors: None,
                    trace_id: None,
                },
            ),
            ApiError::Validation(validation) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: "Validation failed".to_string(),
                    status_code: 400,
                    errors: Some(validation.into_map()),
                    trace_id: None,
                },
            ),
            ApiError::Fault(source) => {
                let trace_id = Uuid::new_v4().to_string();
                tracing::error!(%trace_id, error = %source, "unhandled store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        message: "An internal server error occurred. Please try again later."
                            .to_string(),
                        status_code: 500,
                        errors: None,
                        trace_id: Some(trace_id),
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
