//! Services module
//!
//! Typed wrappers over the backend endpoints used by the admin screens

pub mod personal_training;
pub mod resource;
pub mod students;
pub mod units;

// Re-export commonly used services
pub use personal_training::PersonalTrainingService;
pub use resource::{ListPage, ResourceService};
pub use students::StudentService;
pub use units::UnitService;

use std::time::Instant;

use crate::api::ApiClient;
use crate::models::Activity;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub activities: ResourceService<Activity>,
    pub units: UnitService,
    pub students: StudentService,
    pub personal_training: PersonalTrainingService,
    client: ApiClient,
    health_path: String,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services sharing one client
    pub fn new(client: ApiClient, health_path: impl Into<String>) -> Self {
        Self {
            activities: ResourceService::new(client.clone()),
            units: UnitService::new(client.clone()),
            students: StudentService::new(client.clone()),
            personal_training: PersonalTrainingService::new(client.clone()),
            client,
            health_path: health_path.into(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Probe the backend health endpoint
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let started = Instant::now();
        let result = self.client.probe(&self.health_path).await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(status) => ServiceHealthStatus {
                backend_reachable: true,
                status: Some(status),
                latency_ms,
                error: None,
            },
            Err(e) => ServiceHealthStatus {
                backend_reachable: false,
                status: None,
                latency_ms,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Health status of the backend
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub backend_reachable: bool,
    pub status: Option<u16>,
    pub latency_ms: u64,
    pub error: Option<String>,
}

impl ServiceHealthStatus {
    /// Reachable and not answering with a server error
    pub fn is_healthy(&self) -> bool {
        self.backend_reachable && self.status.map_or(false, |s| s < 500)
    }

    /// Get list of problems found by the probe
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.backend_reachable {
            issues.push(format!(
                "Servidor inacessível: {}",
                self.error.as_deref().unwrap_or("erro desconhecido")
            ));
        }
        if let Some(status) = self.status.filter(|s| *s >= 500) {
            issues.push(format!("Verificação de saúde respondeu {}", status));
        }

        issues
    }
}
