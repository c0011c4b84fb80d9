//! Shared client readiness
//!
//! The first caller of [`ApiHandle::ready`] builds the client and probes the
//! backend health endpoint; every other caller awaits that same
//! initialisation instead of polling for it.

use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::client::ApiClient;
use crate::config::ApiConfig;
use crate::utils::errors::{AcademyError, Result};

#[derive(Debug)]
pub struct ApiHandle {
    config: ApiConfig,
    client: OnceCell<ApiClient>,
}

impl ApiHandle {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    /// Client if initialisation already completed
    pub fn get(&self) -> Option<&ApiClient> {
        self.client.get()
    }

    /// Wait until the backend answered the health probe
    pub async fn ready(&self) -> Result<&ApiClient> {
        self.client
            .get_or_try_init(|| async {
                let client = ApiClient::new(&self.config)?;
                self.wait_healthy(&client).await?;
                Ok(client)
            })
            .await
    }

    async fn wait_healthy(&self, client: &ApiClient) -> Result<()> {
        let interval = Duration::from_millis(self.config.ready_interval_ms);

        for attempt in 1..=self.config.ready_attempts {
            match client.probe(&self.config.health_path).await {
                Ok(status) if status < 500 => {
                    info!(attempt = attempt, status = status, "Backend is ready");
                    return Ok(());
                }
                Ok(status) => {
                    warn!(attempt = attempt, status = status, "Backend not ready yet");
                }
                Err(e) => {
                    warn!(attempt = attempt, error = %e, "Backend unreachable");
                }
            }

            if attempt < self.config.ready_attempts {
                tokio::time::sleep(interval).await;
            }
        }

        Err(AcademyError::ServiceUnavailable(format!(
            "backend at {} did not become ready after {} attempts",
            client.base_url(),
            self.config.ready_attempts
        )))
    }
}
