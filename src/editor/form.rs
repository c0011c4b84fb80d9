//! Form fields and form state
//!
//! Fields are addressed by dotted names (`user.email`) so nested entities
//! flatten into one form and fold back into nested JSON on submit.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::models::resource::split_list;
use crate::utils::errors::FieldError;
use crate::utils::helpers::digits_only;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    /// Comma or newline separated, sent as a JSON array
    List,
    Bool,
    /// `YYYY-MM-DD`
    Date,
}

/// Clean-up applied to the raw input before validation and submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalizer {
    Trim,
    Digits,
    Upper,
    Lower,
}

impl Normalizer {
    pub fn apply(&self, raw: &str) -> String {
        match self {
            Normalizer::Trim => raw.trim().to_string(),
            Normalizer::Digits => digits_only(raw),
            Normalizer::Upper => raw.trim().to_uppercase(),
            Normalizer::Lower => raw.trim().to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    /// 8–9 digits
    ZipCode,
    /// Two uppercase letters
    StateCode,
    /// 10–11 digits
    Phone,
    /// 11 digits
    Cpf,
    MinLen(usize),
    MaxLen(usize),
    IntRange(i64, i64),
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub normalizer: Normalizer,
    pub rules: &'static [Rule],
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            normalizer: Normalizer::Trim,
            rules: &[],
        }
    }

    pub const fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub const fn normalize(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub const fn rules(mut self, rules: &'static [Rule]) -> Self {
        self.rules = rules;
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }

    /// Last dotted segment: `email` for `user.email`
    pub fn leaf(&self) -> &'static str {
        self.name.rsplit('.').next().unwrap_or(self.name)
    }
}

/// Raw values, dirty flag and per-field errors of one form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    values: BTreeMap<String, String>,
    errors: BTreeMap<String, String>,
    dirty: bool,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate from an entity's JSON, one value per declared field
    pub fn from_entity(fields: &[FieldSpec], entity: &Value) -> Self {
        let values = fields
            .iter()
            .filter_map(|f| lookup(entity, f.name).map(|v| (f.name.to_string(), display_value(v))))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        Self {
            values,
            errors: BTreeMap::new(),
            dirty: false,
        }
    }

    pub fn from_values(values: BTreeMap<String, String>) -> Self {
        Self {
            values,
            errors: BTreeMap::new(),
            dirty: true,
        }
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
        self.errors.remove(name);
        self.dirty = true;
    }

    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn normalized(&self, field: &FieldSpec) -> String {
        field.normalizer.apply(self.get(field.name))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn set_errors(&mut self, errors: &[FieldError]) {
        self.errors = errors
            .iter()
            .map(|e| (e.field.clone(), e.message.clone()))
            .collect();
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Nested JSON body built from the normalised values
    ///
    /// Empty fields are left out.
    pub fn payload(&self, fields: &[FieldSpec]) -> Value {
        self.build_payload(fields, false)
    }

    /// Like `payload`, but every declared field is sent
    ///
    /// Empty text becomes `""`, empty lists `[]` and other empty kinds
    /// `null`, so a field cleared while editing is cleared on the server.
    pub fn update_payload(&self, fields: &[FieldSpec]) -> Value {
        self.build_payload(fields, true)
    }

    fn build_payload(&self, fields: &[FieldSpec], keep_empty: bool) -> Value {
        let mut root = Map::new();
        for field in fields {
            let value = self.normalized(field);
            let json = if !value.is_empty() {
                typed_value(field.kind, &value)
            } else if keep_empty {
                cleared_value(field.kind)
            } else {
                continue;
            };
            insert_path(&mut root, field.name, json);
        }
        Value::Object(root)
    }
}

fn cleared_value(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Text => Value::String(String::new()),
        FieldKind::List => Value::Array(Vec::new()),
        FieldKind::Integer | FieldKind::Bool | FieldKind::Date => Value::Null,
    }
}

fn typed_value(kind: FieldKind, value: &str) -> Value {
    match kind {
        FieldKind::Text | FieldKind::Date => Value::String(value.to_string()),
        FieldKind::Integer => value
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(value.to_string())),
        FieldKind::List => Value::Array(split_list(value).into_iter().map(Value::String).collect()),
        FieldKind::Bool => Value::Bool(parse_bool(value)),
    }
}

pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "sim" | "s" | "yes" | "on"
    )
}

fn lookup<'a>(value: &'a Value, dotted: &str) -> Option<&'a Value> {
    dotted
        .split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

fn insert_path(root: &mut Map<String, Value>, dotted: &str, value: Value) {
    let mut segments = dotted.split('.').peekable();
    let mut current = root;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::text("user.firstName", "Nome").rules(&[Rule::Required]),
        FieldSpec::text("user.email", "Email").normalize(Normalizer::Lower),
        FieldSpec::text("zipcode", "CEP").normalize(Normalizer::Digits),
        FieldSpec::text("duration", "Duração").kind(FieldKind::Integer),
        FieldSpec::text("equipment", "Equipamentos").kind(FieldKind::List),
        FieldSpec::text("isActive", "Ativo").kind(FieldKind::Bool),
    ];

    #[test]
    fn test_from_entity_flattens_nested_fields() {
        let entity = json!({
            "user": {"firstName": "Ana", "email": "ana@ex.com"},
            "duration": 15,
            "equipment": ["luvas", "aparador"],
            "isActive": false
        });
        let form = FormState::from_entity(FIELDS, &entity);
        assert_eq!(form.get("user.firstName"), "Ana");
        assert_eq!(form.get("duration"), "15");
        assert_eq!(form.get("equipment"), "luvas, aparador");
        assert_eq!(form.get("isActive"), "false");
        assert_eq!(form.get("zipcode"), "");
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_payload_nests_and_types_values() {
        let mut form = FormState::new();
        form.set("user.firstName", "  Ana ");
        form.set("user.email", "ANA@EX.COM");
        form.set("zipcode", "01310-100");
        form.set("duration", "20");
        form.set("equipment", "luvas,\naparador");
        form.set("isActive", "sim");

        assert_eq!(
            form.payload(FIELDS),
            json!({
                "user": {"firstName": "Ana", "email": "ana@ex.com"},
                "zipcode": "01310100",
                "duration": 20,
                "equipment": ["luvas", "aparador"],
                "isActive": true
            })
        );
    }

    #[test]
    fn test_update_payload_sends_cleared_fields() {
        let mut form = FormState::from_entity(
            FIELDS,
            &json!({"user": {"firstName": "Ana", "email": "ana@ex.com"}, "duration": 15, "equipment": ["luvas"]}),
        );
        form.set("user.email", "");
        form.set("duration", " ");
        form.set("equipment", "");

        assert_eq!(
            form.update_payload(FIELDS),
            json!({
                "user": {"firstName": "Ana", "email": ""},
                "zipcode": "",
                "duration": null,
                "equipment": [],
                "isActive": null
            })
        );
        assert_eq!(form.payload(FIELDS), json!({"user": {"firstName": "Ana"}}));
    }

    #[test]
    fn test_set_clears_field_error() {
        let mut form = FormState::new();
        form.set_errors(&[FieldError::new("zipcode", "CEP inválido")]);
        assert_eq!(form.error("zipcode"), Some("CEP inválido"));
        form.set("zipcode", "01310100");
        assert_eq!(form.error("zipcode"), None);
        assert!(form.is_dirty());
    }

    #[test]
    fn test_leaf() {
        assert_eq!(FIELDS[1].leaf(), "email");
        assert_eq!(FIELDS[2].leaf(), "zipcode");
    }
}
