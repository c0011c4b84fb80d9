//! Resource descriptions shared by list and editor screens

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// One table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

/// One filter dimension offered by a list screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    /// Query parameter name
    pub key: &'static str,
    pub label: &'static str,
    /// Accepted values; empty means free text
    pub allowed: &'static [&'static str],
}

impl FilterSpec {
    pub fn accepts(&self, value: &str) -> bool {
        self.allowed.is_empty() || self.allowed.contains(&value)
    }
}

/// A backend entity reachable under a REST collection path
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection path, e.g. `/api/activities`
    const PATH: &'static str;
    const SINGULAR: &'static str;
    const PLURAL: &'static str;
    /// Backend offers `GET {PATH}/count`
    const SUPPORTS_COUNT: bool = false;
    /// Backend offers `GET {PATH}/ids`
    const SUPPORTS_IDS: bool = false;
    /// Label of the distinct-value statistic shown next to the totals
    const STAT_LABEL: &'static str = "";

    fn id(&self) -> Option<&str>;

    fn columns() -> &'static [Column];

    /// Display value of one column
    fn cell(&self, key: &str) -> String;

    fn filters() -> &'static [FilterSpec] {
        &[]
    }

    /// Value counted for the distinct-value statistic
    fn stat_value(&self) -> Option<String> {
        None
    }

    fn filter_spec(key: &str) -> Option<&'static FilterSpec> {
        Self::filters().iter().find(|f| f.key == key)
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", Self::PATH, urlencoding::encode(id))
    }
}

/// Accept either a JSON array of strings or a single delimited string
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrString {
        List(Vec<String>),
        Text(String),
        Null,
    }

    Ok(match Option::<ListOrString>::deserialize(deserializer)? {
        Some(ListOrString::List(items)) => items,
        Some(ListOrString::Text(text)) => split_list(&text),
        Some(ListOrString::Null) | None => Vec::new(),
    })
}

/// Split a comma or newline separated list, dropping blanks
pub fn split_list(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accept ids sent either as strings or numbers
pub fn flexible_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "string_list")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "flexible_id")]
        id: Option<String>,
    }

    #[test]
    fn test_string_list_accepts_both_shapes() {
        let h: Holder = serde_json::from_str(r#"{"items": ["luvas", "aparador"]}"#).unwrap();
        assert_eq!(h.items, vec!["luvas", "aparador"]);

        let h: Holder = serde_json::from_str(r#"{"items": "luvas, aparador,"}"#).unwrap();
        assert_eq!(h.items, vec!["luvas", "aparador"]);

        let h: Holder = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(h.items.is_empty());
    }

    #[test]
    fn test_flexible_id() {
        let h: Holder = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(h.id.as_deref(), Some("42"));
        let h: Holder = serde_json::from_str(r#"{"id": "a-1"}"#).unwrap();
        assert_eq!(h.id.as_deref(), Some("a-1"));
    }
}
