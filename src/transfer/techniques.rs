//! Technique import and export
//!
//! Export writes every `TECHNIQUE` activity in the academy's technique file
//! format. Import takes an array of technique objects, validates it up front
//! and creates one activity per entry in small concurrent batches.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::models::{Activity, ActivityType};
use crate::services::ResourceService;
use crate::utils::errors::{AcademyError, Result};
use crate::utils::helpers::{date_stamp, truncate_text};
use crate::utils::logging::log_bulk_result;

/// Types accepted in an import file
pub const IMPORT_TYPES: &[&str] = &["TECHNIQUE", "STRETCH", "DRILL", "EXERCISE", "GAME", "CHALLENGE"];

pub const MAX_IMPORT_BYTES: u64 = 10 * 1024 * 1024;

/// Error lines kept for display after an import
const SHOWN_ERRORS: usize = 10;

const SOURCE_SYSTEM: &str = "Academia Krav Maga v2.0";

/// One entry of an import file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechniqueImport {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub technique_type: String,
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub safety: Vec<String>,
}

impl TechniqueImport {
    /// Activity body for `POST /api/activities`
    pub fn to_activity_body(&self) -> Value {
        json!({
            "title": self.name,
            "description": self.description,
            "type": self.technique_type,
            "equipment": self.equipment,
            "safety": if self.safety.is_empty() { Value::Null } else { Value::String(self.safety.join("\n")) },
            "difficulty": self.difficulty,
            "adaptations": [],
        })
    }
}

/// Check the whole file before anything is sent
///
/// Returns every problem found, each prefixed with the 1-based entry number.
pub fn validate_techniques(value: &Value) -> std::result::Result<Vec<TechniqueImport>, Vec<String>> {
    let entries = match value {
        Value::Array(entries) => entries,
        _ => return Err(vec!["Deve ser um array de técnicas".to_string()]),
    };
    if entries.is_empty() {
        return Err(vec!["Array não pode estar vazio".to_string()]);
    }

    let mut errors = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let prefix = format!("Técnica {}:", index + 1);
        let Some(object) = entry.as_object() else {
            errors.push(format!("{} deve ser um objeto", prefix));
            continue;
        };
        check_entry(&prefix, object, &mut errors);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    entries
        .iter()
        .map(|entry| serde_json::from_value(entry.clone()))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| vec![format!("Formato inválido: {}", e)])
}

fn check_entry(prefix: &str, object: &Map<String, Value>, errors: &mut Vec<String>) {
    for field in ["name", "description", "type"] {
        let valid = object
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty());
        if !valid {
            errors.push(format!("{} '{}' é obrigatório e deve ser string", prefix, field));
        }
    }

    if let Some(kind) = object.get("type").and_then(Value::as_str) {
        if !kind.is_empty() && !IMPORT_TYPES.contains(&kind) {
            errors.push(format!("{} 'type' deve ser um de: {}", prefix, IMPORT_TYPES.join(", ")));
        }
    }

    if let Some(difficulty) = object.get("difficulty") {
        let in_range = difficulty.as_u64().is_some_and(|d| (1..=5).contains(&d));
        if !in_range {
            errors.push(format!(
                "{} 'difficulty' deve ser um número inteiro entre 1 e 5",
                prefix
            ));
        }
    }

    for field in ["equipment", "instructions", "tips", "safety"] {
        if object.get(field).is_some_and(|v| !v.is_array()) {
            errors.push(format!("{} '{}' deve ser um array", prefix, field));
        }
    }
}

/// Preview numbers shown before an import starts
#[derive(Debug, Clone, PartialEq)]
pub struct ImportStats {
    pub total: usize,
    pub type_count: BTreeMap<String, usize>,
    pub categories: BTreeSet<String>,
    /// Mean over entries that declare a difficulty; 0 when none do
    pub avg_difficulty: f64,
}

pub fn import_stats(techniques: &[TechniqueImport]) -> ImportStats {
    let mut type_count = BTreeMap::new();
    let mut categories = BTreeSet::new();
    let (mut sum, mut rated) = (0u32, 0u32);

    for technique in techniques {
        *type_count.entry(technique.technique_type.clone()).or_insert(0) += 1;
        if let Some(category) = technique.category.as_ref().filter(|c| !c.is_empty()) {
            categories.insert(category.clone());
        }
        if let Some(difficulty) = technique.difficulty {
            sum += u32::from(difficulty);
            rated += 1;
        }
    }

    ImportStats {
        total: techniques.len(),
        type_count,
        categories,
        avg_difficulty: if rated > 0 { f64::from(sum) / f64::from(rated) } else { 0.0 },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportProgress {
    pub done: usize,
    pub total: usize,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub succeeded: usize,
    pub failed: usize,
    /// `"<name>: <message>"` per failed entry
    pub errors: Vec<String>,
}

impl ImportReport {
    /// First error lines plus how many more were left out
    pub fn shown_errors(&self) -> (&[String], usize) {
        let shown = &self.errors[..self.errors.len().min(SHOWN_ERRORS)];
        (shown, self.errors.len() - shown.len())
    }

    pub fn summary(&self) -> String {
        if self.failed == 0 {
            format!("{} técnicas importadas com sucesso!", self.succeeded)
        } else {
            format!("{} técnicas importadas, {} com erro", self.succeeded, self.failed)
        }
    }
}

/// Create one activity per technique; entries of a batch run concurrently
pub async fn import_techniques<F>(
    service: &ResourceService<Activity>,
    techniques: &[TechniqueImport],
    batch_size: usize,
    mut progress: F,
) -> ImportReport
where
    F: FnMut(ImportProgress),
{
    let total = techniques.len();
    let batch_size = batch_size.max(1);
    let mut report = ImportReport::default();

    progress(ImportProgress {
        done: 0,
        total,
        status: "Iniciando importação...".to_string(),
    });

    for (batch_no, batch) in techniques.chunks(batch_size).enumerate() {
        let done = batch_no * batch_size;
        progress(ImportProgress {
            done,
            total,
            status: format!("Processando lote {}...", batch_no + 1),
        });
        debug!(batch = batch_no + 1, size = batch.len(), "Importing technique batch");

        let results = join_all(batch.iter().map(|technique| async move {
            let body = technique.to_activity_body();
            (technique, service.create(&body).await)
        }))
        .await;

        for (technique, result) in results {
            match result {
                Ok(_) => report.succeeded += 1,
                Err(e) => {
                    warn!(technique = %technique.name, error = %e, "Technique import failed");
                    report.failed += 1;
                    report.errors.push(format!("{}: {}", technique.name, import_error_message(&e)));
                }
            }
        }
    }

    progress(ImportProgress {
        done: total,
        total,
        status: "Importação concluída!".to_string(),
    });
    log_bulk_result("activities", "import", report.succeeded, report.failed);
    report
}

fn import_error_message(error: &AcademyError) -> String {
    match error {
        AcademyError::Api { message } => message.clone(),
        AcademyError::Validation(fields) => crate::utils::errors::summarize_field_errors(fields),
        other => other.to_string(),
    }
}

/// Read, parse and validate an import file
pub async fn read_techniques_file(path: &Path) -> Result<Vec<TechniqueImport>> {
    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_IMPORT_BYTES {
        return Err(AcademyError::InvalidInput(
            "Arquivo muito grande. Máximo 10MB permitido".to_string(),
        ));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| AcademyError::InvalidInput(format!("Arquivo JSON inválido: {}", e)))?;

    validate_techniques(&value)
        .map_err(|errors| AcademyError::InvalidInput(format!("Formato inválido: {}", errors.join(", "))))
}

/// One technique in the export file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechniqueExport {
    pub nome: String,
    pub descricao: String,
    pub observacoes: String,
    pub categoria: String,
    pub nivel_dificuldade: u8,
    pub repeticoes: Value,
    pub duracao: Value,
    pub precisao: String,
    pub tags: Vec<String>,
    pub equipamentos: Vec<String>,
    #[serde(rename = "_metadata")]
    pub metadata: ExportItemMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportItemMetadata {
    pub exported_at: String,
    pub source_id: Option<String>,
    pub source_system: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechniqueExportFile {
    pub techniques: Vec<TechniqueExport>,
    pub metadata: ExportFileMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFileMetadata {
    pub exported_at: String,
    pub version: String,
    pub total_techniques: usize,
    pub source: String,
}

/// Where an export was written and how many records it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub count: usize,
}

/// Repetitions arrive as an object, a JSON string or free text
pub fn parse_repetitions(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Object(map)) => Value::Object(map.clone()),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Value::Object(map),
            _ => json!({ "padrao": text }),
        },
        _ => json!({}),
    }
}

/// Technique export of every `TECHNIQUE` activity in `activities`
pub fn build_export(activities: &[Activity], now: DateTime<Utc>) -> TechniqueExportFile {
    let exported_at = now.to_rfc3339();
    let techniques: Vec<TechniqueExport> = activities
        .iter()
        .filter(|a| a.activity_type == Some(ActivityType::Technique))
        .map(|activity| TechniqueExport {
            nome: export_name(activity),
            descricao: activity.description.clone().unwrap_or_default(),
            observacoes: activity.notes.clone().unwrap_or_default(),
            categoria: activity
                .category
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "Geral".to_string()),
            nivel_dificuldade: activity.difficulty.unwrap_or(1),
            repeticoes: parse_repetitions(activity.repetitions.as_ref()),
            duracao: activity
                .duration
                .map(Value::from)
                .unwrap_or_else(|| Value::String("30 segundos".to_string())),
            precisao: "baixa".to_string(),
            tags: activity.tags.clone(),
            equipamentos: activity.equipment.clone(),
            metadata: ExportItemMetadata {
                exported_at: exported_at.clone(),
                source_id: activity.id.clone(),
                source_system: SOURCE_SYSTEM.to_string(),
            },
        })
        .collect();

    TechniqueExportFile {
        metadata: ExportFileMetadata {
            exported_at,
            version: "2.0".to_string(),
            total_techniques: techniques.len(),
            source: "Academia Krav Maga - Módulo de Atividades".to_string(),
        },
        techniques,
    }
}

fn export_name(activity: &Activity) -> String {
    if !activity.title.trim().is_empty() {
        return activity.title.clone();
    }
    match activity.description.as_deref() {
        Some(d) if !d.trim().is_empty() => truncate_text(d, 50),
        _ => "Atividade sem nome".to_string(),
    }
}

pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("tecnicas-krav-maga-{}.json", date_stamp(now))
}

/// Fetch all activities and write the technique export into `dir`
///
/// Returns `None` when there is no technique to export.
pub async fn export_techniques(
    service: &ResourceService<Activity>,
    page_size: u32,
    dir: &Path,
    now: DateTime<Utc>,
) -> Result<Option<ExportSummary>> {
    let query = [
        ("page".to_string(), "1".to_string()),
        ("pageSize".to_string(), page_size.to_string()),
    ];
    let page = service.list(&query).await?;
    debug!(activities = page.items.len(), "Activities fetched for export");

    let export = build_export(&page.items, now);
    if export.techniques.is_empty() {
        return Ok(None);
    }

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(export_file_name(now));
    tokio::fs::write(&path, serde_json::to_string_pretty(&export)?).await?;

    let count = export.techniques.len();
    info!(path = %path.display(), count = count, "Techniques exported");
    Ok(Some(ExportSummary { path, count }))
}
