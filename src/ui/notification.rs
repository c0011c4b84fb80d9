//! User-facing notifications (toasts)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::errors::{summarize_field_errors, AcademyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastLevel::Success => "success",
            ToastLevel::Info => "info",
            ToastLevel::Warning => "warning",
            ToastLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, message)
    }

    /// Error toast prefixed with what the user was doing
    ///
    /// Validation errors list every field as `"<message> (<field>)"`.
    pub fn from_error(action: &str, error: &AcademyError) -> Self {
        let detail = match error {
            AcademyError::Validation(fields) => summarize_field_errors(fields),
            AcademyError::Transport(_) => "não foi possível conectar ao servidor".to_string(),
            AcademyError::HttpStatus { status, .. } => format!("servidor respondeu {}", status),
            AcademyError::Api { message } => message.clone(),
            other => other.to_string(),
        };
        Self::error(format!("{}: {}", action, detail))
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.as_str(), self.message)
    }
}

/// Sink for toasts; views and the console implement it
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}
