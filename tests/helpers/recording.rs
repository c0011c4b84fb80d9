//! Views that record what the controllers asked them to draw

use std::marker::PhantomData;
use std::sync::Mutex;

use academy_admin::editor::{EditorMode, EditorView, FieldSpec, FormState, SaveStatus};
use academy_admin::list::{ListQuery, ListStats, ListView, Pagination, Selection, ViewMode};
use academy_admin::models::Resource;
use academy_admin::ui::{Notifier, Toast};
use academy_admin::utils::errors::{AcademyError, FieldError};

#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    Loading,
    Items { ids: Vec<String>, mode: ViewMode },
    Empty,
    Error(String),
    Pagination(Pagination),
    Stats(ListStats),
    Selection(usize),
}

pub struct RecordingListView<R> {
    events: Mutex<Vec<ListEvent>>,
    toasts: Mutex<Vec<Toast>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> RecordingListView<R> {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            toasts: Mutex::new(Vec::new()),
            _resource: PhantomData,
        }
    }

    pub fn events(&self) -> Vec<ListEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn last_pagination(&self) -> Option<Pagination> {
        self.events().into_iter().rev().find_map(|e| match e {
            ListEvent::Pagination(p) => Some(p),
            _ => None,
        })
    }

    pub fn last_stats(&self) -> Option<ListStats> {
        self.events().into_iter().rev().find_map(|e| match e {
            ListEvent::Stats(s) => Some(s),
            _ => None,
        })
    }

    pub fn rendered_items(&self) -> Vec<Vec<String>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ListEvent::Items { ids, .. } => Some(ids),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ListEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl<R> Notifier for RecordingListView<R> {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

impl<R: Resource> ListView<R> for RecordingListView<R> {
    fn show_loading(&self) {
        self.push(ListEvent::Loading);
    }

    fn render_items(&self, items: &[R], _selection: &Selection, mode: ViewMode) {
        let ids = items
            .iter()
            .map(|i| i.id().unwrap_or_default().to_string())
            .collect();
        self.push(ListEvent::Items { ids, mode });
    }

    fn render_empty(&self, _query: &ListQuery) {
        self.push(ListEvent::Empty);
    }

    fn render_error(&self, error: &AcademyError) {
        self.push(ListEvent::Error(error.to_string()));
    }

    fn render_pagination(&self, pagination: &Pagination) {
        self.push(ListEvent::Pagination(*pagination));
    }

    fn render_stats(&self, stats: &ListStats) {
        self.push(ListEvent::Stats(stats.clone()));
    }

    fn render_selection(&self, selection: &Selection) {
        self.push(ListEvent::Selection(selection.len()));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Loading(bool),
    Form(EditorMode),
    FieldErrors(Vec<FieldError>),
    Submit(bool),
    Status(SaveStatus),
    NavigateToList,
}

#[derive(Default)]
pub struct RecordingEditorView {
    events: Mutex<Vec<EditorEvent>>,
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingEditorView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<SaveStatus> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                EditorEvent::Status(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn navigated(&self) -> bool {
        self.events().contains(&EditorEvent::NavigateToList)
    }

    fn push(&self, event: EditorEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Notifier for RecordingEditorView {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

impl EditorView for RecordingEditorView {
    fn show_loading(&self, loading: bool) {
        self.push(EditorEvent::Loading(loading));
    }

    fn render_form(&self, mode: &EditorMode, _fields: &[FieldSpec], _form: &FormState) {
        self.push(EditorEvent::Form(mode.clone()));
    }

    fn render_field_errors(&self, errors: &[FieldError]) {
        self.push(EditorEvent::FieldErrors(errors.to_vec()));
    }

    fn set_submit_enabled(&self, enabled: bool) {
        self.push(EditorEvent::Submit(enabled));
    }

    fn set_save_status(&self, status: SaveStatus) {
        self.push(EditorEvent::Status(status));
    }

    fn navigate_to_list(&self) {
        self.push(EditorEvent::NavigateToList);
    }
}
