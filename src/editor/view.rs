//! Rendering surface of an editor screen

use std::fmt;

use super::form::{FieldSpec, FormState};
use crate::ui::notification::Notifier;
use crate::utils::errors::FieldError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit { id: String },
}

impl EditorMode {
    pub fn id(&self) -> Option<&str> {
        match self {
            EditorMode::Create => None,
            EditorMode::Edit { id } => Some(id),
        }
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorMode::Create => f.write_str("create"),
            EditorMode::Edit { id } => write!(f, "edit:{}", id),
        }
    }
}

/// Status line next to the save button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Unsaved,
    Saving,
    Saved,
    AutoSaved,
    Failed,
    AutoSaveFailed,
}

impl SaveStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SaveStatus::Unsaved => "Alterações não salvas",
            SaveStatus::Saving => "Salvando...",
            SaveStatus::Saved => "Salvo com sucesso",
            SaveStatus::AutoSaved => "Auto-salvo",
            SaveStatus::Failed => "Erro ao salvar",
            SaveStatus::AutoSaveFailed => "Erro no auto-save",
        }
    }
}

pub trait EditorView: Notifier + Send + Sync + 'static {
    fn show_loading(&self, loading: bool);

    fn render_form(&self, mode: &EditorMode, fields: &[FieldSpec], form: &FormState);

    /// Inline errors; an empty slice clears them
    fn render_field_errors(&self, errors: &[FieldError]);

    fn set_submit_enabled(&self, enabled: bool);

    fn set_save_status(&self, status: SaveStatus);

    /// Leave the editor for the list screen
    fn navigate_to_list(&self);
}
