//! Unit service: units plus the reference data the unit editor needs

use serde_json::Value;
use tracing::{debug, info};

use super::resource::ResourceService;
use crate::api::{ApiClient, ModuleApi};
use crate::models::{Organization, Resource, TrainingArea, Unit};
use crate::utils::errors::{AcademyError, Result};

#[derive(Debug, Clone)]
pub struct UnitService {
    resource: ResourceService<Unit>,
    api: ModuleApi,
}

impl UnitService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            resource: ResourceService::new(client.clone()),
            api: ModuleApi::new("units", client),
        }
    }

    pub fn resource(&self) -> &ResourceService<Unit> {
        &self.resource
    }

    /// Training areas of a unit
    ///
    /// Older backends only expose the flat `/api/training-areas?unitId=`
    /// collection, so a 404 on the nested route falls back to it.
    pub async fn training_areas(&self, unit_id: &str) -> Result<Vec<TrainingArea>> {
        let nested = format!("{}/training-areas", Unit::item_path(unit_id));
        let envelope = match self.api.fetch_with_states(&nested, &[]).await {
            Ok(state) => state.into_envelope(),
            Err(AcademyError::HttpStatus { status: 404, .. }) => {
                debug!(unit_id = %unit_id, "Nested training-areas route missing, using flat collection");
                self.api
                    .fetch_with_states(
                        "/api/training-areas",
                        &[("unitId".to_string(), unit_id.to_string())],
                    )
                    .await?
                    .into_envelope()
            }
            Err(e) => return Err(e),
        };

        let areas = decode_list::<TrainingArea>(envelope.data)?;
        info!(unit_id = %unit_id, count = areas.len(), "Training areas loaded");
        Ok(areas)
    }

    pub async fn organizations(&self) -> Result<Vec<Organization>> {
        let envelope = self
            .api
            .fetch_with_states("/api/organizations", &[])
            .await?
            .into_envelope();
        decode_list(envelope.data)
    }
}

/// Decode an array payload into typed records; `null` yields an empty list
pub(crate) fn decode_list<T: serde::de::DeserializeOwned>(data: Value) -> Result<Vec<T>> {
    match data {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => Ok(serde_json::from_value(data)?),
        other => Err(AcademyError::Api {
            message: format!("esperava uma lista, recebeu {}", kind_of(&other)),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "booleano",
        Value::Number(_) => "número",
        Value::String(_) => "texto",
        Value::Array(_) => "lista",
        Value::Object(_) => "objeto",
    }
}
