//! Backend response envelope
//!
//! The backend answers in three shapes: `{success, data, ...}` with pagination
//! fields at the top level, the same with a nested `pagination` object, or a
//! bare value/array. `ApiEnvelope::from_value` folds them into one type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::errors::FieldError;

/// Pagination metadata reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub count: u64,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub total_pages: Option<u32>,
}

/// One structured validation error from the server-side schema validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub path: DetailPath,
    #[serde(default)]
    pub message: String,
}

/// `path` arrives as an array of segments or as a dotted string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailPath {
    Segments(Vec<Value>),
    Dotted(String),
}

impl Default for DetailPath {
    fn default() -> Self {
        DetailPath::Segments(Vec::new())
    }
}

impl DetailPath {
    /// Path segments as strings; numeric array indices are kept as digits
    pub fn segments(&self) -> Vec<String> {
        match self {
            DetailPath::Segments(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
            DetailPath::Dotted(text) => text
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Dotted form without numeric segments (`user.email`)
    pub fn dotted(&self) -> String {
        self.segments()
            .into_iter()
            .filter(|s| !s.chars().all(|c| c.is_ascii_digit()))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl ErrorDetail {
    pub fn to_field_error(&self) -> FieldError {
        let field = self.path.dotted();
        FieldError::new(if field.is_empty() { "form".to_string() } else { field }, self.message.clone())
    }
}

/// Normalised backend response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiEnvelope {
    pub success: bool,
    pub data: Value,
    pub message: Option<String>,
    pub error: Option<String>,
    pub details: Vec<ErrorDetail>,
    pub pagination: Option<PageMeta>,
}

impl ApiEnvelope {
    /// Normalise any of the observed response shapes
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) if map.contains_key("success") => {
                let success = map.get("success").and_then(Value::as_bool).unwrap_or(false);
                let pagination = Self::top_level_meta(&map)
                    .or_else(|| map.get("pagination").and_then(Self::nested_meta));
                let details = map
                    .remove("details")
                    .and_then(|d| serde_json::from_value::<Vec<ErrorDetail>>(d).ok())
                    .unwrap_or_default();
                Self {
                    success,
                    data: map.remove("data").unwrap_or(Value::Null),
                    message: map.get("message").and_then(Value::as_str).map(str::to_string),
                    error: map.get("error").and_then(Value::as_str).map(str::to_string),
                    details,
                    pagination,
                }
            }
            other => Self {
                success: true,
                data: other,
                message: None,
                error: None,
                details: Vec::new(),
                pagination: None,
            },
        }
    }

    fn top_level_meta(map: &serde_json::Map<String, Value>) -> Option<PageMeta> {
        let count = map.get("count").or_else(|| map.get("total")).and_then(Value::as_u64)?;
        Some(PageMeta {
            count,
            page: map.get("page").and_then(as_u32),
            page_size: map.get("pageSize").or_else(|| map.get("limit")).and_then(as_u32),
            total_pages: map.get("totalPages").and_then(as_u32),
        })
    }

    fn nested_meta(value: &Value) -> Option<PageMeta> {
        let map = value.as_object()?;
        Self::top_level_meta(map)
    }

    /// Whether the payload counts as "no data"
    pub fn is_empty(&self) -> bool {
        match &self.data {
            Value::Null => true,
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Best human-readable failure message
    pub fn failure_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "API returned error".to_string())
    }

    pub fn field_errors(&self) -> Vec<FieldError> {
        self.details.iter().map(ErrorDetail::to_field_error).collect()
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_with_top_level_pagination() {
        let env = ApiEnvelope::from_value(json!({
            "success": true,
            "data": [{"id": "1"}],
            "count": 45, "page": 3, "pageSize": 20, "totalPages": 3
        }));
        assert!(env.success);
        assert_eq!(
            env.pagination,
            Some(PageMeta { count: 45, page: Some(3), page_size: Some(20), total_pages: Some(3) })
        );
    }

    #[test]
    fn test_envelope_with_nested_pagination() {
        let env = ApiEnvelope::from_value(json!({
            "success": true,
            "data": [],
            "pagination": {"total": 7, "page": 1, "limit": 5}
        }));
        let meta = env.pagination.unwrap();
        assert_eq!(meta.count, 7);
        assert_eq!(meta.page_size, Some(5));
        assert!(env.is_empty());
    }

    #[test]
    fn test_bare_array_is_success_without_meta() {
        let env = ApiEnvelope::from_value(json!([{"id": "1"}, {"id": "2"}]));
        assert!(env.success);
        assert!(env.pagination.is_none());
        assert!(!env.is_empty());
    }

    #[test]
    fn test_details_map_to_field_errors() {
        let env = ApiEnvelope::from_value(json!({
            "success": false,
            "error": "Validation failed",
            "details": [
                {"path": ["email"], "message": "Email inválido"},
                {"path": ["user", "phones", 0, "number"], "message": "Telefone inválido"},
                {"path": "state", "message": "UF inválida"}
            ]
        }));
        assert!(!env.success);
        let errors = env.field_errors();
        assert_eq!(errors[0], FieldError::new("email", "Email inválido"));
        assert_eq!(errors[1].field, "user.phones.number");
        assert_eq!(errors[2].field, "state");
        assert_eq!(env.failure_message(), "Validation failed");
    }
}
