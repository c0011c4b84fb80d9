//! Per-module API helper
//!
//! Screens talk to the backend through a `ModuleApi` named after the module,
//! which classifies fetch results into loaded/empty and tags every log line
//! with the module name.

use serde_json::Value;
use tracing::{debug, info};

use super::client::{ApiClient, Query};
use crate::models::ApiEnvelope;
use crate::utils::errors::Result;
use crate::utils::logging::log_api_error;

/// Outcome of a successful fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Loaded(ApiEnvelope),
    /// `data` was null or an empty array
    Empty(ApiEnvelope),
}

impl FetchState {
    pub fn envelope(&self) -> &ApiEnvelope {
        match self {
            FetchState::Loaded(env) | FetchState::Empty(env) => env,
        }
    }

    pub fn into_envelope(self) -> ApiEnvelope {
        match self {
            FetchState::Loaded(env) | FetchState::Empty(env) => env,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FetchState::Empty(_))
    }
}

/// HTTP verb used to persist a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMethod {
    Post,
    Put,
    Patch,
}

impl SaveMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveMethod::Post => "POST",
            SaveMethod::Put => "PUT",
            SaveMethod::Patch => "PATCH",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModuleApi {
    module: &'static str,
    client: ApiClient,
}

impl ModuleApi {
    pub fn new(module: &'static str, client: ApiClient) -> Self {
        Self { module, client }
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// GET and classify the payload as loaded or empty
    pub async fn fetch_with_states(&self, path: &str, query: &Query) -> Result<FetchState> {
        debug!(module = self.module, path = %path, "Fetching");
        match self.client.get(path, query).await {
            Ok(envelope) if envelope.is_empty() => {
                debug!(module = self.module, path = %path, "Fetch returned no data");
                Ok(FetchState::Empty(envelope))
            }
            Ok(envelope) => Ok(FetchState::Loaded(envelope)),
            Err(e) => {
                log_api_error(path, &e, Some(self.module));
                Err(e)
            }
        }
    }

    /// Persist a body with the given verb
    pub async fn save_with_feedback(&self, method: SaveMethod, path: &str, body: &Value) -> Result<ApiEnvelope> {
        let result = match method {
            SaveMethod::Post => self.client.post(path, body).await,
            SaveMethod::Put => self.client.put(path, body).await,
            SaveMethod::Patch => self.client.patch(path, body).await,
        };

        match result {
            Ok(envelope) => {
                info!(module = self.module, method = method.as_str(), path = %path, "Saved");
                Ok(envelope)
            }
            Err(e) => {
                log_api_error(path, &e, Some(self.module));
                Err(e)
            }
        }
    }

    pub async fn delete(&self, path: &str) -> Result<ApiEnvelope> {
        match self.client.delete(path).await {
            Ok(envelope) => {
                info!(module = self.module, path = %path, "Deleted");
                Ok(envelope)
            }
            Err(e) => {
                log_api_error(path, &e, Some(self.module));
                Err(e)
            }
        }
    }
}
