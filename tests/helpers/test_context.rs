//! Test context for unified test setup
//!
//! Builds settings pointed at the mock backend, a client and a scratch
//! directory for preference and export files.

use std::sync::{Arc, Once};

use academy_admin::api::ApiClient;
use academy_admin::config::Settings;
use academy_admin::services::ServiceFactory;
use academy_admin::state::PreferenceStore;
use tempfile::TempDir;

use super::mock_backend::MockBackend;

static INIT: Once = Once::new();

/// Initialize logging for tests (called once)
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("academy_admin=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Settings for a backend at `base_url` with short timers
pub fn test_settings(base_url: &str, temp_dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.api.base_url = base_url.to_string();
    settings.api.timeout_seconds = 5;
    settings.api.ready_attempts = 2;
    settings.api.ready_interval_ms = 10;
    settings.list.search_debounce_ms = 50;
    settings.editor.auto_save_idle_ms = 100;
    settings.storage.preferences_path = temp_dir
        .path()
        .join("preferences.json")
        .to_string_lossy()
        .into_owned();
    settings.storage.export_dir = temp_dir.path().join("exports").to_string_lossy().into_owned();
    settings
}

/// Unified test context that manages all test components
pub struct TestContext {
    pub backend: MockBackend,
    pub settings: Settings,
    pub client: ApiClient,
    pub temp_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        init_test_logging();
        let backend = MockBackend::new().await;
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let settings = test_settings(&backend.uri(), &temp_dir);
        let client = ApiClient::new(&settings.api).expect("Failed to build client");

        Self {
            backend,
            settings,
            client,
            temp_dir,
        }
    }

    pub fn services(&self) -> ServiceFactory {
        ServiceFactory::new(self.client.clone(), self.settings.api.health_path.clone())
    }

    pub async fn preferences(&self) -> Arc<PreferenceStore> {
        Arc::new(PreferenceStore::load(&self.settings.storage.preferences_path).await)
    }
}
