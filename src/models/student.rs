//! Student model and the student sub-resources

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::resource::{flexible_id, Column, FilterSpec, Resource};
use crate::utils::helpers::format_phone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentCategory {
    Adult,
    Teen,
    Child,
    Senior,
}

impl StudentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentCategory::Adult => "ADULT",
            StudentCategory::Teen => "TEEN",
            StudentCategory::Child => "CHILD",
            StudentCategory::Senior => "SENIOR",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StudentCategory::Adult => "Adulto",
            StudentCategory::Teen => "Adolescente",
            StudentCategory::Child => "Infantil",
            StudentCategory::Senior => "Sênior",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentUser {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default, deserialize_with = "flexible_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub user: StudentUser,
    #[serde(default)]
    pub category: Option<StudentCategory>,
    #[serde(default)]
    pub physical_condition: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    #[serde(default)]
    pub medical_conditions: Option<String>,
    #[serde(default, skip_serializing)]
    pub enrollments: Vec<Enrollment>,
    #[serde(default, skip_serializing)]
    pub subscriptions: Vec<Subscription>,
}

fn default_active() -> bool {
    true
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.user.first_name, self.user.last_name).trim().to_string()
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_active {
            "Ativo"
        } else {
            "Inativo"
        }
    }
}

pub const STUDENT_CATEGORIES: &[&str] = &["ADULT", "TEEN", "CHILD", "SENIOR"];
pub const STUDENT_STATUSES: &[&str] = &["active", "inactive"];

const COLUMNS: &[Column] = &[
    Column { key: "name", header: "Nome", width: 28 },
    Column { key: "email", header: "Email", width: 28 },
    Column { key: "phone", header: "Telefone", width: 16 },
    Column { key: "category", header: "Categoria", width: 12 },
    Column { key: "status", header: "Status", width: 8 },
];

const FILTERS: &[FilterSpec] = &[
    FilterSpec { key: "status", label: "Status", allowed: STUDENT_STATUSES },
    FilterSpec { key: "category", label: "Categoria", allowed: STUDENT_CATEGORIES },
];

impl Resource for Student {
    const PATH: &'static str = "/api/students";
    const SINGULAR: &'static str = "estudante";
    const PLURAL: &'static str = "estudantes";
    const STAT_LABEL: &'static str = "Categorias";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn cell(&self, key: &str) -> String {
        match key {
            "name" => self.full_name(),
            "email" => self.user.email.clone().unwrap_or_default(),
            "phone" => self.user.phone.as_deref().map(format_phone).unwrap_or_default(),
            "category" => self.category.map(|c| c.label().to_string()).unwrap_or_default(),
            "status" => self.status_label().to_string(),
            _ => String::new(),
        }
    }

    fn filters() -> &'static [FilterSpec] {
        FILTERS
    }

    fn stat_value(&self) -> Option<String> {
        self.category.map(|c| c.as_str().to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCourse {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub progress: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
}

/// Financial overview of one student; unknown fields are kept verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    #[serde(default)]
    pub total_paid: Option<f64>,
    #[serde(default)]
    pub total_pending: Option<f64>,
    #[serde(default)]
    pub overdue_count: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_defaults_to_active() {
        let student: Student = serde_json::from_str(
            r#"{"id": "s1", "user": {"firstName": "Ana", "lastName": "Costa"}, "category": "ADULT"}"#,
        )
        .unwrap();
        assert!(student.is_active);
        assert_eq!(student.full_name(), "Ana Costa");
        assert_eq!(student.cell("category"), "Adulto");
        assert_eq!(student.cell("status"), "Ativo");
    }

    #[test]
    fn test_financial_summary_keeps_unknown_fields() {
        let summary: FinancialSummary =
            serde_json::from_str(r#"{"totalPaid": 300.0, "nextDueDate": "2025-08-10"}"#).unwrap();
        assert_eq!(summary.total_paid, Some(300.0));
        assert!(summary.extra.contains_key("nextDueDate"));
    }
}
