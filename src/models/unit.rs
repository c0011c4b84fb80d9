//! Unit model

use serde::{Deserialize, Serialize};

use super::resource::{flexible_id, Column, FilterSpec, Resource};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    #[serde(default, deserialize_with = "flexible_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub complement: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zipcode: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub operating_hours: Option<String>,
}

pub const UNIT_STATUSES: &[&str] = &["active", "inactive", "maintenance"];

const COLUMNS: &[Column] = &[
    Column { key: "name", header: "Nome", width: 28 },
    Column { key: "city", header: "Cidade", width: 18 },
    Column { key: "state", header: "UF", width: 4 },
    Column { key: "phone", header: "Telefone", width: 16 },
    Column { key: "status", header: "Status", width: 10 },
];

const FILTERS: &[FilterSpec] = &[
    FilterSpec { key: "status", label: "Status", allowed: UNIT_STATUSES },
    FilterSpec { key: "organizationId", label: "Organização", allowed: &[] },
];

impl Resource for Unit {
    const PATH: &'static str = "/api/units";
    const SINGULAR: &'static str = "unidade";
    const PLURAL: &'static str = "unidades";
    const STAT_LABEL: &'static str = "Cidades";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "name" => self.name.clone(),
            "city" => self.city.clone().unwrap_or_default(),
            "state" => self.state.clone().unwrap_or_default(),
            "phone" => self
                .phone
                .as_deref()
                .map(crate::utils::helpers::format_phone)
                .unwrap_or_default(),
            "status" => self.status.clone().unwrap_or_else(|| "active".to_string()),
            _ => String::new(),
        }
    }

    fn filters() -> &'static [FilterSpec] {
        FILTERS
    }

    fn stat_value(&self) -> Option<String> {
        self.city.clone().filter(|c| !c.is_empty())
    }
}
