//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub api: ApiConfig,
    pub list: ListConfig,
    pub editor: EditorConfig,
    pub import: ImportConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub auth_token: Option<String>,
    pub health_path: String,
    pub ready_attempts: u32,
    pub ready_interval_ms: u64,
}

/// List screen configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub search_debounce_ms: u64,
    pub bulk_delete_batch_size: usize,
}

/// Editor screen configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EditorConfig {
    pub auto_save: bool,
    pub auto_save_idle_ms: u64,
}

/// Technique import configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportConfig {
    pub batch_size: usize,
}

/// Local storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub preferences_path: String,
    pub export_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub max_files: u32,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("ACADEMY").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::AcademyError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:3000".to_string(),
                timeout_seconds: 30,
                user_agent: "AcademyAdmin/1.0".to_string(),
                auth_token: None,
                health_path: "/health".to_string(),
                ready_attempts: 10,
                ready_interval_ms: 250,
            },
            list: ListConfig {
                default_page_size: 20,
                max_page_size: 1000,
                search_debounce_ms: 300,
                bulk_delete_batch_size: 10,
            },
            editor: EditorConfig {
                auto_save: true,
                auto_save_idle_ms: 2000,
            },
            import: ImportConfig { batch_size: 5 },
            storage: StorageConfig {
                preferences_path: ".academy-admin/preferences.json".to_string(),
                export_dir: ".".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
                max_files: 5,
            },
        }
    }
}
