//! Application context shared by the console handlers

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Settings;
use crate::services::ServiceFactory;
use crate::state::storage::PreferenceStore;
use crate::ui::notification::Notifier;

/// Application-wide context containing services and settings
#[derive(Clone)]
pub struct AppContext {
    pub settings: Settings,
    pub services: Arc<ServiceFactory>,
    pub preferences: Arc<PreferenceStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    pub fn new(
        settings: Settings,
        services: Arc<ServiceFactory>,
        preferences: Arc<PreferenceStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            settings,
            services,
            preferences,
            notifier,
        }
    }

    /// Build the services from a ready client and open the preference file
    pub async fn from_client(
        settings: Settings,
        client: ApiClient,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let services = Arc::new(ServiceFactory::new(client, settings.api.health_path.clone()));
        let preferences = Arc::new(PreferenceStore::load(&settings.storage.preferences_path).await);
        Self::new(settings, services, preferences, notifier)
    }

    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(&self.settings.storage.export_dir)
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("settings", &self.settings)
            .field("services", &self.services)
            .field("preferences", &self.preferences.path())
            .finish_non_exhaustive()
    }
}
