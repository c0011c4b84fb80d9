//! Activity model

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::resource::{flexible_id, string_list, Column, FilterSpec, Resource};
use crate::utils::helpers::truncate_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Technique,
    Stretch,
    Drill,
    Exercise,
    Game,
    Challenge,
    Assessment,
}

impl ActivityType {
    pub const ALL: [ActivityType; 7] = [
        ActivityType::Technique,
        ActivityType::Stretch,
        ActivityType::Drill,
        ActivityType::Exercise,
        ActivityType::Game,
        ActivityType::Challenge,
        ActivityType::Assessment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Technique => "TECHNIQUE",
            ActivityType::Stretch => "STRETCH",
            ActivityType::Drill => "DRILL",
            ActivityType::Exercise => "EXERCISE",
            ActivityType::Game => "GAME",
            ActivityType::Challenge => "CHALLENGE",
            ActivityType::Assessment => "ASSESSMENT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::Technique => "Técnica",
            ActivityType::Stretch => "Alongamento",
            ActivityType::Drill => "Drill",
            ActivityType::Exercise => "Exercício",
            ActivityType::Game => "Jogo",
            ActivityType::Challenge => "Desafio",
            ActivityType::Assessment => "Avaliação",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default, deserialize_with = "flexible_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub activity_type: Option<ActivityType>,
    #[serde(default)]
    pub difficulty: Option<u8>,
    /// Minutes
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "string_list")]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub safety: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<Value>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub const ACTIVITY_TYPES: &[&str] = &[
    "TECHNIQUE", "STRETCH", "DRILL", "EXERCISE", "GAME", "CHALLENGE", "ASSESSMENT",
];

pub const DIFFICULTY_LEVELS: &[&str] = &["1", "2", "3", "4", "5"];

const COLUMNS: &[Column] = &[
    Column { key: "title", header: "Atividade", width: 32 },
    Column { key: "type", header: "Tipo", width: 12 },
    Column { key: "difficulty", header: "Dificuldade", width: 11 },
    Column { key: "duration", header: "Duração", width: 8 },
    Column { key: "equipment", header: "Equipamentos", width: 28 },
];

const FILTERS: &[FilterSpec] = &[
    FilterSpec { key: "type", label: "Tipo", allowed: ACTIVITY_TYPES },
    FilterSpec { key: "difficulty", label: "Dificuldade", allowed: DIFFICULTY_LEVELS },
];

impl Activity {
    /// Title with the fallbacks used in listings
    pub fn display_title(&self) -> String {
        if !self.title.trim().is_empty() {
            return self.title.clone();
        }
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => truncate_text(d, 50),
            _ => "Atividade sem nome".to_string(),
        }
    }

    pub fn difficulty_label(level: u8) -> &'static str {
        match level {
            1 => "Iniciante",
            2 => "Básico",
            3 => "Intermediário",
            4 => "Avançado",
            5 => "Expert",
            _ => "Indefinido",
        }
    }

    fn equipment_summary(&self) -> String {
        if self.equipment.is_empty() {
            return "Nenhum".to_string();
        }
        let shown = self.equipment.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
        if self.equipment.len() > 3 {
            format!("{} +{}", shown, self.equipment.len() - 3)
        } else {
            shown
        }
    }
}

impl Resource for Activity {
    const PATH: &'static str = "/api/activities";
    const SINGULAR: &'static str = "atividade";
    const PLURAL: &'static str = "atividades";
    const SUPPORTS_COUNT: bool = true;
    const SUPPORTS_IDS: bool = true;
    const STAT_LABEL: &'static str = "Tipos";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "title" => self.display_title(),
            "type" => self
                .activity_type
                .map(|t| t.label().to_string())
                .unwrap_or_else(|| "Indefinido".to_string()),
            "difficulty" => {
                let level = self.difficulty.unwrap_or(1).clamp(1, 5);
                format!("{} {}", "*".repeat(level as usize), Self::difficulty_label(level))
            }
            "duration" => format!("{} min", self.duration.unwrap_or(5)),
            "equipment" => self.equipment_summary(),
            _ => String::new(),
        }
    }

    fn filters() -> &'static [FilterSpec] {
        FILTERS
    }

    fn stat_value(&self) -> Option<String> {
        self.activity_type.map(|t| t.as_str().to_string())
    }
}
