//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." A 400 whose body parses as the service's standard error shape
//! becomes `Validation` with the field-level messages preserved; every other
//! non-2xx response lands in `HttpError` with the raw status code and body
//! for debugging.

use std::collections::BTreeMap;
use std::fmt;

/// Errors returned by `TodoClient` parse methods.
#[derive(Debug)]
pub enum ApiError {
    /// The server returned 404 — the requested todo does not exist.
    NotFound,

    /// The server rejected the payload with field-level messages.
    Validation {
        message: String,
        errors: BTreeMap<String, Vec<String>>,
    },

    /// The server returned a non-2xx status other than 404 or a
    /// recognizable validation failure.
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound => write!(f, "resource not found"),
            ApiError::Validation { message, errors } => {
                write!(f, "{message} ({} field(s) rejected)", errors.len())
            }
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
