//! Typed error handling for the sales query service
//!
//! Errors fall into a small number of categories so that callers (and the
//! HTTP layer) can react to them specifically instead of matching on
//! strings.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: malformed request parameters, detected before any
//!   query runs (HTTP 400)
//! - [`StorageError`]: the data source is unavailable or a query failed
//!   (HTTP 500 / 503)
//! - [`ConfigError`]: invalid service configuration, reported at startup
//!
//! # Example
//!
//! ```rust,ignore
//! match service.list_sales(&params).await {
//!     Ok(page) => println!("{} items", page.items.len()),
//!     Err(SalesError::Validation(e)) => eprintln!("bad request: {}", e),
//!     Err(e) => eprintln!("service error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for the sales query service
#[derive(Debug)]
pub enum SalesError {
    /// Invalid request parameters
    Validation(ValidationError),

    /// Data source errors
    Storage(StorageError),
}

impl fmt::Display for SalesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SalesError::Validation(e) => write!(f, "{}", e),
            SalesError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SalesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SalesError::Validation(e) => Some(e),
            SalesError::Storage(e) => Some(e),
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl SalesError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            SalesError::Validation(_) => StatusCode::BAD_REQUEST,
            SalesError::Storage(e) => e.status_code(),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            SalesError::Validation(e) => e.error_code(),
            SalesError::Storage(e) => e.error_code(),
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            SalesError::Validation(ValidationError::InvalidInteger { parameter, value })
            | SalesError::Validation(ValidationError::OutOfRange {
                parameter, value, ..
            }) => Some(serde_json::json!({
                "parameter": parameter,
                "value": value
            })),
            _ => None,
        }
    }
}

impl IntoResponse for SalesError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to request parameter validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A parameter that must be an integer was not one
    InvalidInteger { parameter: String, value: String },

    /// An integer parameter was outside its accepted range
    OutOfRange {
        parameter: String,
        value: String,
        message: String,
    },

    /// The query string itself could not be decoded
    MalformedQuery { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidInteger { parameter, value } => {
                write!(
                    f,
                    "Invalid value '{}' for parameter '{}': expected an integer",
                    value, parameter
                )
            }
            ValidationError::OutOfRange {
                parameter,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for parameter '{}': {}",
                    value, parameter, message
                )
            }
            ValidationError::MalformedQuery { message } => {
                write!(f, "Malformed query string: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidInteger { .. } => "INVALID_INTEGER",
            ValidationError::OutOfRange { .. } => "VALUE_OUT_OF_RANGE",
            ValidationError::MalformedQuery { .. } => "MALFORMED_QUERY",
        }
    }
}

impl From<ValidationError> for SalesError {
    fn from(err: ValidationError) -> Self {
        SalesError::Validation(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the data source
#[derive(Debug)]
pub enum StorageError {
    /// Could not open or reach the data source
    ConnectionError { backend: String, message: String },

    /// Query execution error
    QueryError {
        backend: String,
        operation: String,
        message: String,
    },

    /// Backend not available
    Unavailable { backend: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StorageError::QueryError {
                backend,
                operation,
                message,
            } => {
                write!(f, "{} {} query error: {}", backend, operation, message)
            }
            StorageError::Unavailable { backend } => {
                write!(f, "Storage backend '{}' is unavailable", backend)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::ConnectionError { .. } => StatusCode::SERVICE_UNAVAILABLE,
            StorageError::QueryError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            StorageError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::ConnectionError { .. } => "STORAGE_CONNECTION_ERROR",
            StorageError::QueryError { .. } => "STORAGE_QUERY_ERROR",
            StorageError::Unavailable { .. } => "STORAGE_UNAVAILABLE",
        }
    }
}

impl From<StorageError> for SalesError {
    fn from(err: StorageError) -> Self {
        SalesError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for sales query operations
pub type SalesResult<T> = Result<T, SalesError>;
