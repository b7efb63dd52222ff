//! Error types for the math service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use thiserror::Error;

use crate::models::ErrorResponse;

// == Math Error Enum ==
/// Failure raised by a pure computation function.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Input lies outside the mathematical domain of the function
    #[error("{0}")]
    Domain(String),

    /// Result magnitude exceeds the representable range
    #[error("{0}")]
    Overflow(String),
}

// == Cache Error Enum ==
/// Bookkeeping failure inside the cache engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Key exceeds the maximum supported length
    #[error("Key exceeds maximum length of {max} bytes (got {len})")]
    KeyTooLong { len: usize, max: usize },

    /// Cache is full and no entry could be evicted
    #[error("Cache full: {0}")]
    CacheFull(String),
}

// == Service Error Enum ==
/// Unified error type returned by the executor and the HTTP layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Bad input shape or bounds, caught before computation
    #[error("{message}")]
    Validation {
        operation: Option<String>,
        message: String,
        details: Vec<String>,
    },

    /// Input outside the operation's mathematical domain
    #[error("{message}")]
    Domain {
        operation: String,
        message: String,
        input: Value,
    },

    /// Result exceeds representable magnitude
    #[error("{message}")]
    Overflow {
        operation: String,
        message: String,
        input: Value,
    },

    /// No operation registered under this name
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Unexpected failure in cache or stats bookkeeping
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Creates a validation error carrying a single detail line.
    pub fn validation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        ServiceError::Validation {
            operation: Some(operation.into()),
            details: vec![message.clone()],
            message,
        }
    }

    /// Wraps a computation failure with the operation and its inputs.
    pub fn from_math(operation: impl Into<String>, input: Value, err: MathError) -> Self {
        let operation = operation.into();
        match err {
            MathError::Domain(message) => ServiceError::Domain {
                operation,
                message,
                input,
            },
            MathError::Overflow(message) => ServiceError::Overflow {
                operation,
                message,
                input,
            },
        }
    }

    // == Error Type ==
    /// Stable discriminant reported to clients as `error_type`.
    pub fn error_type(&self) -> &'static str {
        match self {
            ServiceError::Validation { .. } => "ValidationError",
            ServiceError::Domain { .. } => "DomainError",
            ServiceError::Overflow { .. } => "OverflowError",
            ServiceError::UnknownOperation(_) => "UnknownOperation",
            ServiceError::Internal(_) => "InternalError",
        }
    }

    /// HTTP status used when this error reaches a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Domain { .. } | ServiceError::Overflow { .. } => StatusCode::BAD_REQUEST,
            ServiceError::UnknownOperation(_) => StatusCode::NOT_FOUND,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Operation the error belongs to, if known.
    pub fn operation(&self) -> Option<&str> {
        match self {
            ServiceError::Validation { operation, .. } => operation.as_deref(),
            ServiceError::Domain { operation, .. } | ServiceError::Overflow { operation, .. } => {
                Some(operation)
            }
            ServiceError::UnknownOperation(operation) => Some(operation),
            ServiceError::Internal(_) => None,
        }
    }

    /// Human-readable detail lines.
    pub fn details(&self) -> Vec<String> {
        match self {
            ServiceError::Validation { details, .. } => details.clone(),
            ServiceError::Domain { input, .. } | ServiceError::Overflow { input, .. } => {
                describe_input(input)
            }
            ServiceError::UnknownOperation(_) | ServiceError::Internal(_) => Vec::new(),
        }
    }

    fn input(&self) -> Option<&Value> {
        match self {
            ServiceError::Domain { input, .. } | ServiceError::Overflow { input, .. } => {
                Some(input)
            }
            _ => None,
        }
    }
}

fn describe_input(input: &Value) -> Vec<String> {
    match input {
        Value::Object(map) => map.iter().map(|(k, v)| format!("{} = {}", k, v)).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

impl From<CacheError> for ServiceError {
    fn from(err: CacheError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            details: self.details(),
            error_type: self.error_type().to_string(),
            success: false,
            operation: self.operation().map(str::to_string),
            input_data: self.input().cloned(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the math service.
pub type Result<T> = std::result::Result<T, ServiceError>;
