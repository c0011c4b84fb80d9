//! Rendering surface of a list screen

use std::fmt;

use serde::{Deserialize, Serialize};

use super::pagination::Pagination;
use super::query::ListQuery;
use super::selection::Selection;
use crate::models::Resource;
use crate::ui::notification::Notifier;
use crate::utils::errors::AcademyError;

/// Table or card grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Cards,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Table => "table",
            ViewMode::Cards => "cards",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "table" | "tabela" => Some(ViewMode::Table),
            "cards" | "grid" => Some(ViewMode::Cards),
            _ => None,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary numbers shown above a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListStats {
    pub total: u64,
    pub exact: bool,
    pub on_page: usize,
    /// Distinct values of the resource's stat column on this page
    pub distinct: usize,
    pub distinct_label: &'static str,
    pub selected: usize,
}

/// Everything a list controller draws
///
/// Implementations must not call back into the controller from these
/// methods; they run while the controller state is locked.
pub trait ListView<R: Resource>: Notifier + Send + Sync + 'static {
    fn show_loading(&self);

    fn render_items(&self, items: &[R], selection: &Selection, mode: ViewMode);

    /// Nothing matched the current query
    fn render_empty(&self, query: &ListQuery);

    /// Failed load; the view offers a retry action
    fn render_error(&self, error: &AcademyError);

    fn render_pagination(&self, pagination: &Pagination);

    fn render_stats(&self, stats: &ListStats);

    fn render_selection(&self, selection: &Selection);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_mode_parse() {
        assert_eq!(ViewMode::parse("Cards"), Some(ViewMode::Cards));
        assert_eq!(ViewMode::parse("tabela"), Some(ViewMode::Table));
        assert_eq!(ViewMode::parse("list"), None);
        assert_eq!(serde_json::to_string(&ViewMode::Cards).unwrap(), "\"cards\"");
    }
}
