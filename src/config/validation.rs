//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{AcademyError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_api_config(&settings.api)?;
    validate_list_config(&settings.list)?;
    validate_editor_config(&settings.editor)?;
    validate_import_config(&settings.import)?;
    validate_storage_config(&settings.storage)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate backend API configuration
fn validate_api_config(config: &super::ApiConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(AcademyError::Config("API base URL is required".to_string()));
    }

    let parsed = url::Url::parse(&config.base_url)
        .map_err(|e| AcademyError::Config(format!("Invalid API base URL {}: {}", config.base_url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AcademyError::Config(format!(
            "API base URL must use http or https, got {}",
            parsed.scheme()
        )));
    }

    if config.timeout_seconds == 0 {
        return Err(AcademyError::Config("API timeout must be greater than 0".to_string()));
    }

    if !config.health_path.starts_with('/') {
        return Err(AcademyError::Config("Health path must start with '/'".to_string()));
    }

    if config.ready_attempts == 0 {
        return Err(AcademyError::Config("Ready attempts must be greater than 0".to_string()));
    }

    Ok(())
}

/// Validate list screen configuration
fn validate_list_config(config: &super::ListConfig) -> Result<()> {
    if config.default_page_size == 0 {
        return Err(AcademyError::Config("Default page size must be greater than 0".to_string()));
    }

    if config.default_page_size > config.max_page_size {
        return Err(AcademyError::Config(
            "Default page size cannot be greater than max page size".to_string(),
        ));
    }

    if config.search_debounce_ms == 0 {
        return Err(AcademyError::Config("Search debounce must be greater than 0".to_string()));
    }

    if config.bulk_delete_batch_size == 0 {
        return Err(AcademyError::Config("Bulk delete batch size must be greater than 0".to_string()));
    }

    Ok(())
}

/// Validate editor configuration
fn validate_editor_config(config: &super::EditorConfig) -> Result<()> {
    if config.auto_save && config.auto_save_idle_ms == 0 {
        return Err(AcademyError::Config(
            "Auto-save idle time must be greater than 0 when auto-save is enabled".to_string(),
        ));
    }

    Ok(())
}

/// Validate import configuration
fn validate_import_config(config: &super::ImportConfig) -> Result<()> {
    if config.batch_size == 0 {
        return Err(AcademyError::Config("Import batch size must be greater than 0".to_string()));
    }

    Ok(())
}

/// Validate local storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.preferences_path.is_empty() {
        return Err(AcademyError::Config("Preferences path is required".to_string()));
    }

    if config.export_dir.is_empty() {
        return Err(AcademyError::Config("Export directory is required".to_string()));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(AcademyError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(AcademyError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut settings = Settings::default();
        settings.api.base_url = "ftp://academy.local".to_string();
        assert_matches!(validate_settings(&settings), Err(AcademyError::Config(_)));
    }

    #[test]
    fn test_rejects_page_size_above_max() {
        let mut settings = Settings::default();
        settings.list.default_page_size = 5000;
        assert_matches!(validate_settings(&settings), Err(AcademyError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert_matches!(validate_settings(&settings), Err(AcademyError::Config(_)));
    }

    #[test]
    fn test_zero_idle_allowed_when_auto_save_disabled() {
        let mut settings = Settings::default();
        settings.editor.auto_save = false;
        settings.editor.auto_save_idle_ms = 0;
        assert!(validate_settings(&settings).is_ok());
    }
}
