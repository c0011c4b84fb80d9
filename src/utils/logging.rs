//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the admin client.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::{AcademyError, ErrorSeverity, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the program.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix("academy-admin")
        .filename_suffix("log")
        .max_log_files(config.max_files as usize)
        .build(&config.file_path)
        .map_err(|e| AcademyError::Config(format!("Cannot open log directory {}: {}", config.file_path, e)))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .map_err(|e| AcademyError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log admin actions (create, update, delete, import)
pub fn log_admin_action(resource: &str, action: &str, target: Option<&str>, details: Option<&str>) {
    info!(
        resource = resource,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log API errors at a level matching their severity
pub fn log_api_error(endpoint: &str, error: &AcademyError, context: Option<&str>) {
    let status = error.status();
    let recoverable = error.is_recoverable();
    match error.severity() {
        ErrorSeverity::Info => debug!(
            endpoint = endpoint,
            status = status,
            error = %error,
            context = context,
            "API request rejected"
        ),
        ErrorSeverity::Warning => warn!(
            endpoint = endpoint,
            status = status,
            recoverable = recoverable,
            error = %error,
            context = context,
            "API request failed"
        ),
        ErrorSeverity::Error | ErrorSeverity::Critical => error!(
            endpoint = endpoint,
            status = status,
            recoverable = recoverable,
            error = %error,
            context = context,
            "API error occurred"
        ),
    }
}

/// Log the tally of a non-atomic bulk operation
pub fn log_bulk_result(resource: &str, operation: &str, succeeded: usize, failed: usize) {
    if failed == 0 {
        info!(
            resource = resource,
            operation = operation,
            succeeded = succeeded,
            "Bulk operation completed"
        );
    } else {
        warn!(
            resource = resource,
            operation = operation,
            succeeded = succeeded,
            failed = failed,
            "Bulk operation partially failed"
        );
    }
}

/// Log request timing
pub fn log_request_timing(method: &str, path: &str, duration_ms: u64, status: Option<u16>) {
    debug!(
        method = method,
        path = path,
        duration_ms = duration_ms,
        status = status,
        "Request completed"
    );
}
