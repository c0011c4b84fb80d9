//! Plain-text views for the console binary

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::notification::{Notifier, Toast};
use crate::editor::{EditorMode, EditorView, FieldSpec, FormState, SaveStatus};
use crate::list::{ListQuery, ListStats, ListView, Pagination, Selection, ViewMode};
use crate::models::Resource;
use crate::utils::errors::{AcademyError, FieldError};
use crate::utils::helpers::truncate_text;

enum Sink {
    Stdout,
    Buffer(Mutex<Vec<String>>),
}

/// Line-oriented output shared by every terminal view
pub struct Console {
    sink: Sink,
}

impl Console {
    pub fn stdout() -> Self {
        Self { sink: Sink::Stdout }
    }

    /// Keeps lines in memory instead of printing them
    pub fn buffered() -> Self {
        Self {
            sink: Sink::Buffer(Mutex::new(Vec::new())),
        }
    }

    pub fn line(&self, text: impl Into<String>) {
        let text = text.into();
        match &self.sink {
            Sink::Stdout => println!("{}", text),
            Sink::Buffer(lines) => lines
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(text),
        }
    }

    /// Lines written so far; always empty for stdout
    pub fn lines(&self) -> Vec<String> {
        match &self.sink {
            Sink::Stdout => Vec::new(),
            Sink::Buffer(lines) => lines
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone(),
        }
    }
}

impl Notifier for Console {
    fn notify(&self, toast: Toast) {
        self.line(toast.to_string());
    }
}

/// Pad or cut to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let cut = truncate_text(text, width);
    format!("{:<width$}", cut, width = width)
}

pub struct TerminalListView<R> {
    console: Arc<Console>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> TerminalListView<R> {
    pub fn new(console: Arc<Console>) -> Self {
        Self {
            console,
            _resource: PhantomData,
        }
    }

    fn render_table(&self, items: &[R], selection: &Selection) {
        let columns = R::columns();
        let header: Vec<String> = columns.iter().map(|c| fit(c.header, c.width)).collect();
        self.console.line(format!("    {:<8} {}", "ID", header.join(" | ")));
        let rule_width = 13 + columns.iter().map(|c| c.width + 3).sum::<usize>();
        self.console.line("-".repeat(rule_width));

        for item in items {
            let id = item.id().unwrap_or("-");
            let cells: Vec<String> = columns
                .iter()
                .map(|c| fit(&item.cell(c.key), c.width))
                .collect();
            self.console.line(format!(
                "{} {} {}",
                marker(selection, id),
                fit(id, 8),
                cells.join(" | ")
            ));
        }
    }

    fn render_cards(&self, items: &[R], selection: &Selection) {
        for item in items {
            let id = item.id().unwrap_or("-");
            self.console.line(format!("{} #{}", marker(selection, id), id));
            for column in R::columns() {
                let value = item.cell(column.key);
                if !value.is_empty() {
                    self.console.line(format!("    {}: {}", column.header, value));
                }
            }
        }
    }
}

fn marker(selection: &Selection, id: &str) -> &'static str {
    if selection.contains(id) {
        "[x]"
    } else {
        "[ ]"
    }
}

impl<R: Resource> Notifier for TerminalListView<R> {
    fn notify(&self, toast: Toast) {
        self.console.notify(toast);
    }
}

impl<R: Resource> ListView<R> for TerminalListView<R> {
    fn show_loading(&self) {
        self.console.line(format!("Carregando {}...", R::PLURAL));
    }

    fn render_items(&self, items: &[R], selection: &Selection, mode: ViewMode) {
        match mode {
            ViewMode::Table => self.render_table(items, selection),
            ViewMode::Cards => self.render_cards(items, selection),
        }
    }

    fn render_empty(&self, query: &ListQuery) {
        if query.has_filters() || !query.search.is_empty() {
            self.console.line(format!(
                "Nenhum resultado em {} para os filtros atuais. Use 'clear' para limpar.",
                R::PLURAL
            ));
        } else {
            self.console.line(format!("Ainda não há {} cadastrados.", R::PLURAL));
        }
    }

    fn render_error(&self, error: &AcademyError) {
        self.console.line(format!("Erro ao carregar {}: {}", R::PLURAL, error));
        if error.is_recoverable() {
            self.console.line("Use 'reload' para tentar novamente.");
        }
    }

    fn render_pagination(&self, pagination: &Pagination) {
        self.console.line(format!(
            "{}  (página {}/{}{}{})",
            pagination.label(R::PLURAL),
            pagination.page,
            pagination.total_pages,
            if pagination.has_prev { ", 'prev'" } else { "" },
            if pagination.has_next { ", 'next'" } else { "" },
        ));
    }

    fn render_stats(&self, stats: &ListStats) {
        let total = if stats.exact {
            stats.total.to_string()
        } else {
            format!("{}+", stats.total)
        };
        let mut line = format!("Total: {} | Nesta página: {}", total, stats.on_page);
        if !stats.distinct_label.is_empty() {
            line.push_str(&format!(" | {}: {}", stats.distinct_label, stats.distinct));
        }
        if stats.selected > 0 {
            line.push_str(&format!(" | Selecionados: {}", stats.selected));
        }
        self.console.line(line);
    }

    fn render_selection(&self, selection: &Selection) {
        if selection.all_selected() {
            self.console.line(format!("Todos os {} selecionados ({})", R::PLURAL, selection.len()));
        } else if !selection.is_empty() {
            self.console.line(format!("{} selecionados", selection.len()));
        }
    }
}

/// Editor view; `navigate_to_list` raises a flag the console loop consumes
pub struct TerminalEditorView {
    console: Arc<Console>,
    leave: AtomicBool,
}

impl TerminalEditorView {
    pub fn new(console: Arc<Console>) -> Self {
        Self {
            console,
            leave: AtomicBool::new(false),
        }
    }

    /// Whether the editor asked to go back to the list since the last call
    pub fn take_navigation(&self) -> bool {
        self.leave.swap(false, Ordering::SeqCst)
    }
}

impl Notifier for TerminalEditorView {
    fn notify(&self, toast: Toast) {
        self.console.notify(toast);
    }
}

impl EditorView for TerminalEditorView {
    fn show_loading(&self, loading: bool) {
        if loading {
            self.console.line("Carregando...");
        }
    }

    fn render_form(&self, mode: &EditorMode, fields: &[FieldSpec], form: &FormState) {
        let title = match mode {
            EditorMode::Create => "Novo cadastro".to_string(),
            EditorMode::Edit { id } => format!("Editando #{}", id),
        };
        self.console.line(title);
        for field in fields {
            let required = if field.is_required() { "*" } else { " " };
            self.console.line(format!(
                "  {}{:<28} {:<22} {}",
                required,
                field.label,
                field.name,
                form.get(field.name)
            ));
        }
    }

    fn render_field_errors(&self, errors: &[FieldError]) {
        for error in errors {
            self.console.line(format!("  ! {}: {}", error.field, error.message));
        }
    }

    fn set_submit_enabled(&self, _enabled: bool) {}

    fn set_save_status(&self, status: SaveStatus) {
        self.console.line(format!("({})", status.label()));
    }

    fn navigate_to_list(&self) {
        self.leave.store(true, Ordering::SeqCst);
    }
}
