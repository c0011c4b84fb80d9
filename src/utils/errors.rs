//! Error handling for the academy admin client
//!
//! One error enum for transport, HTTP, API envelope and form validation
//! failures, plus the field-level errors shown next to form inputs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the admin client
#[derive(Error, Debug)]
pub enum AcademyError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("API error: {message}")]
    Api { message: String },

    #[error("Validation failed: {}", summarize_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Response discarded: superseded by a newer request")]
    Stale,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Transport level failures (no usable HTTP response)
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("backend unreachable")]
    ServiceUnavailable,

    #[error("request failed: {0}")]
    RequestFailed(String),
}

/// A validation message attached to one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Render field errors the way they are shown in notifications: `message (field)`
pub fn summarize_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.message, e.field))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for admin client operations
pub type Result<T> = std::result::Result<T, AcademyError>;

impl AcademyError {
    /// Check if the error is recoverable by retrying
    pub fn is_recoverable(&self) -> bool {
        match self {
            AcademyError::Transport(_) => true,
            AcademyError::HttpStatus { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            AcademyError::Api { .. } => true,
            AcademyError::Validation(_) => false,
            AcademyError::Config(_) => false,
            AcademyError::NotFound { .. } => false,
            AcademyError::Stale => true,
            AcademyError::Http(_) => true,
            AcademyError::Serialization(_) => false,
            AcademyError::Csv(_) => false,
            AcademyError::Io(_) => true,
            AcademyError::UrlParse(_) => false,
            AcademyError::InvalidInput(_) => false,
            AcademyError::ServiceUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AcademyError::Config(_) => ErrorSeverity::Critical,
            AcademyError::Validation(_) => ErrorSeverity::Info,
            AcademyError::InvalidInput(_) => ErrorSeverity::Info,
            AcademyError::Stale => ErrorSeverity::Info,
            AcademyError::NotFound { .. } => ErrorSeverity::Warning,
            AcademyError::HttpStatus { status, .. } if *status < 500 => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AcademyError::HttpStatus { status, .. } => Some(*status),
            AcademyError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Field errors carried by a validation failure
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            AcademyError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
