//! Generic CRUD service over one REST collection

use std::marker::PhantomData;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, FetchState, ModuleApi, Query, SaveMethod};
use crate::models::{PageMeta, Resource};
use crate::utils::errors::{AcademyError, Result};

/// One page of a collection as returned by the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<R> {
    pub items: Vec<R>,
    /// `None` when the backend omitted pagination metadata
    pub meta: Option<PageMeta>,
}

impl<R> ListPage<R> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// CRUD access to the collection of `R`
#[derive(Debug, Clone)]
pub struct ResourceService<R: Resource> {
    api: ModuleApi,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceService<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            api: ModuleApi::new(R::PLURAL, client),
            _resource: PhantomData,
        }
    }

    pub fn api(&self) -> &ModuleApi {
        &self.api
    }

    /// Fetch one page; the query carries page, size, search and filters
    pub async fn list(&self, query: &Query) -> Result<ListPage<R>> {
        let state = self.api.fetch_with_states(R::PATH, query).await?;
        let empty = state.is_empty();
        let envelope = state.into_envelope();
        let meta = envelope.pagination;

        if empty {
            return Ok(ListPage { items: Vec::new(), meta });
        }

        let items = decode_items::<R>(envelope.data)?;
        debug!(resource = R::PLURAL, items = items.len(), has_meta = meta.is_some(), "Page decoded");
        Ok(ListPage { items, meta })
    }

    pub async fn get(&self, id: &str) -> Result<R> {
        let path = R::item_path(id);
        match self.api.fetch_with_states(&path, &[]).await {
            Ok(FetchState::Loaded(envelope)) => Ok(serde_json::from_value(envelope.data)?),
            Ok(FetchState::Empty(_)) | Err(AcademyError::HttpStatus { status: 404, .. }) => {
                Err(AcademyError::NotFound {
                    resource: R::SINGULAR.to_string(),
                    id: id.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Raw JSON of one entity, used to populate editor forms
    pub async fn get_raw(&self, id: &str) -> Result<Value> {
        let path = R::item_path(id);
        match self.api.fetch_with_states(&path, &[]).await {
            Ok(FetchState::Loaded(envelope)) => Ok(envelope.data),
            Ok(FetchState::Empty(_)) | Err(AcademyError::HttpStatus { status: 404, .. }) => {
                Err(AcademyError::NotFound {
                    resource: R::SINGULAR.to_string(),
                    id: id.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// POST a new entity and return the created record's JSON
    pub async fn create(&self, body: &Value) -> Result<Value> {
        let envelope = self.api.save_with_feedback(SaveMethod::Post, R::PATH, body).await?;
        info!(resource = R::SINGULAR, id = ?created_id(&envelope.data), "Created");
        Ok(envelope.data)
    }

    pub async fn update(&self, id: &str, body: &Value) -> Result<Value> {
        let envelope = self
            .api
            .save_with_feedback(SaveMethod::Put, &R::item_path(id), body)
            .await?;
        Ok(envelope.data)
    }

    pub async fn patch(&self, id: &str, body: &Value) -> Result<Value> {
        let envelope = self
            .api
            .save_with_feedback(SaveMethod::Patch, &R::item_path(id), body)
            .await?;
        Ok(envelope.data)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&R::item_path(id)).await?;
        Ok(())
    }

    /// Exact collection size from `GET {path}/count`
    pub async fn count(&self, query: &Query) -> Result<u64> {
        if !R::SUPPORTS_COUNT {
            return Err(AcademyError::InvalidInput(format!("{} has no count endpoint", R::PLURAL)));
        }

        let envelope = self
            .api
            .fetch_with_states(&format!("{}/count", R::PATH), query)
            .await?
            .into_envelope();

        let count = match &envelope.data {
            Value::Number(n) => n.as_u64(),
            Value::Object(map) => map
                .get("count")
                .or_else(|| map.get("total"))
                .and_then(Value::as_u64),
            _ => None,
        }
        .or_else(|| envelope.pagination.map(|p| p.count));

        count.ok_or_else(|| {
            warn!(resource = R::PLURAL, data = %envelope.data, "Count endpoint returned no number");
            AcademyError::Api {
                message: format!("resposta inválida de {}/count", R::PATH),
            }
        })
    }

    /// Every id matching the query from `GET {path}/ids`
    pub async fn ids(&self, query: &Query) -> Result<Vec<String>> {
        if !R::SUPPORTS_IDS {
            return Err(AcademyError::InvalidInput(format!("{} has no ids endpoint", R::PLURAL)));
        }

        let envelope = self
            .api
            .fetch_with_states(&format!("{}/ids", R::PATH), query)
            .await?
            .into_envelope();

        let list = match envelope.data {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("ids") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        Ok(list.iter().filter_map(id_string).collect())
    }
}

/// Decode a `data` payload holding an array, or an object wrapping one
pub fn decode_items<R: Resource>(data: Value) -> Result<Vec<R>> {
    let array = match data {
        Value::Array(items) => items,
        Value::Object(mut map) => ["items", "rows", "data", R::PLURAL]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    array
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(AcademyError::from))
        .collect()
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("id").and_then(id_string),
        _ => None,
    }
}

/// Id of a freshly created record, if the backend echoed it
pub fn created_id(data: &Value) -> Option<String> {
    data.get("id").and_then(id_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Activity;
    use serde_json::json;

    #[test]
    fn test_decode_items_accepts_wrapped_arrays() {
        let items: Vec<Activity> =
            decode_items(json!({"items": [{"id": 1, "title": "Soco direto", "type": "TECHNIQUE"}]})).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_deref(), Some("1"));

        let items: Vec<Activity> = decode_items(json!("unexpected")).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_created_id() {
        assert_eq!(created_id(&json!({"id": 7})).as_deref(), Some("7"));
        assert_eq!(created_id(&json!({"id": "abc"})).as_deref(), Some("abc"));
        assert_eq!(created_id(&Value::Null), None);
    }

    #[test]
    fn test_id_string_from_objects() {
        assert_eq!(id_string(&json!({"id": "x"})).as_deref(), Some("x"));
        assert_eq!(id_string(&json!(true)), None);
    }
}
