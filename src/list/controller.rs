//! Generic paginated, filterable, multi-selectable entity list
//!
//! Every load is tagged with the query generation it was issued for. Any
//! change to the query (page, search, filter, sort) bumps the generation, so
//! a response that arrives after the user moved on is dropped instead of
//! overwriting newer state. `detach` drops every late response.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::pagination::Pagination;
use super::query::{ListQuery, SortOrder};
use super::selection::Selection;
use super::view::{ListStats, ListView, ViewMode};
use crate::config::ListConfig;
use crate::models::Resource;
use crate::services::ResourceService;
use crate::state::PreferenceStore;
use crate::ui::notification::Toast;
use crate::utils::debounce::Debouncer;
use crate::utils::errors::{AcademyError, Result};
use crate::utils::helpers::{calculate_offset, count_label};
use crate::utils::logging::{log_admin_action, log_api_error, log_bulk_result};

/// What a call to `load_data` ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { items: usize, total: u64 },
    Empty,
    /// Error state rendered with a retry action
    Failed(String),
    /// A request for the current query is already in flight
    Skipped,
    /// The query changed while the request was in flight
    Stale,
    /// The screen was left; nothing was rendered
    Detached,
}

/// Tally of a bulk delete; never atomic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeleteReport {
    pub succeeded: usize,
    pub failed: usize,
    /// `(id, message)` of each failure
    pub errors: Vec<(String, String)>,
}

struct ListState<R> {
    items: Vec<R>,
    total: u64,
    total_exact: bool,
    query: ListQuery,
    selection: Selection,
    view_mode: ViewMode,
    /// Bumped by every query change
    generation: u64,
    /// Bumped by every issued request
    request_seq: u64,
    /// Generation of the request currently in flight
    in_flight: Option<u64>,
    detached: bool,
    last_error: Option<String>,
}

impl<R: Resource> ListState<R> {
    fn pagination(&self) -> Pagination {
        Pagination::compute(
            self.total,
            self.query.page_size,
            self.query.page,
            self.items.len(),
            self.total_exact,
        )
    }

    fn stats(&self) -> ListStats {
        let distinct: BTreeSet<String> = self.items.iter().filter_map(R::stat_value).collect();
        ListStats {
            total: self.total,
            exact: self.total_exact,
            on_page: self.items.len(),
            distinct: distinct.len(),
            distinct_label: R::STAT_LABEL,
            selected: self.selection.len(),
        }
    }

    fn page_ids(&self) -> Vec<String> {
        self.items.iter().filter_map(|i| i.id().map(str::to_string)).collect()
    }

    fn bump(&mut self) {
        self.generation += 1;
    }
}

struct Inner<R: Resource, V> {
    service: ResourceService<R>,
    view: V,
    preferences: Option<Arc<PreferenceStore>>,
    search_debounce: Debouncer,
    batch_size: usize,
    state: Mutex<ListState<R>>,
}

/// Cheap to clone; clones share state
pub struct EntityListController<R: Resource, V: ListView<R>> {
    inner: Arc<Inner<R, V>>,
}

impl<R: Resource, V: ListView<R>> Clone for EntityListController<R, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Resource, V: ListView<R>> EntityListController<R, V> {
    pub fn new(
        service: ResourceService<R>,
        view: V,
        config: &ListConfig,
        preferences: Option<Arc<PreferenceStore>>,
    ) -> Self {
        let state = ListState {
            items: Vec::new(),
            total: 0,
            total_exact: true,
            query: ListQuery::new(config.default_page_size),
            selection: Selection::new(),
            view_mode: ViewMode::default(),
            generation: 0,
            request_seq: 0,
            in_flight: None,
            detached: false,
            last_error: None,
        };

        Self {
            inner: Arc::new(Inner {
                service,
                view,
                preferences,
                search_debounce: Debouncer::new(
                    "list-search",
                    Duration::from_millis(config.search_debounce_ms),
                ),
                batch_size: config.bulk_delete_batch_size.max(1),
                state: Mutex::new(state),
            }),
        }
    }

    pub fn view(&self) -> &V {
        &self.inner.view
    }

    pub fn service(&self) -> &ResourceService<R> {
        &self.inner.service
    }

    /// Restore the saved view mode and run the first load
    pub async fn mount(&self) -> LoadOutcome {
        if let Some(prefs) = &self.inner.preferences {
            let mode = prefs.view_mode(R::PLURAL).await;
            self.inner.state.lock().await.view_mode = mode;
        }
        info!(resource = R::PLURAL, "List mounted");
        self.load_data().await
    }

    /// Fetch the current page unless a request for it is already running
    pub async fn load_data(&self) -> LoadOutcome {
        let (generation, seq, query) = {
            let mut state = self.inner.state.lock().await;
            if state.detached {
                return LoadOutcome::Detached;
            }
            if state.in_flight == Some(state.generation) {
                debug!(resource = R::PLURAL, generation = state.generation, "Load already in flight, skipping");
                return LoadOutcome::Skipped;
            }
            state.request_seq += 1;
            state.in_flight = Some(state.generation);
            (state.generation, state.request_seq, state.query.clone())
        };

        debug!(resource = R::PLURAL, request_seq = seq, page = query.page, "Loading list");
        self.inner.view.show_loading();

        let result = self.fetch_page(&query).await;

        let mut state = self.inner.state.lock().await;
        if state.in_flight == Some(generation) {
            state.in_flight = None;
        }
        if state.detached {
            debug!(resource = R::PLURAL, request_seq = seq, "Response arrived after detach, discarded");
            return LoadOutcome::Detached;
        }
        if state.generation != generation {
            debug!(
                resource = R::PLURAL,
                request_seq = seq,
                generation = generation,
                current = state.generation,
                "Stale response discarded"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok((items, total, exact)) => {
                state.items = items;
                state.total = total;
                state.total_exact = exact;
                state.last_error = None;
                self.render(&state);

                if state.items.is_empty() {
                    LoadOutcome::Empty
                } else {
                    LoadOutcome::Loaded {
                        items: state.items.len(),
                        total,
                    }
                }
            }
            Err(e) => {
                log_api_error(R::PATH, &e, Some("load_data"));
                state.last_error = Some(e.to_string());
                self.inner.view.render_error(&e);
                LoadOutcome::Failed(e.to_string())
            }
        }
    }

    /// Fetch again even if a request is in flight; its response becomes stale
    pub async fn reload(&self) -> LoadOutcome {
        self.inner.state.lock().await.bump();
        self.load_data().await
    }

    pub async fn next_page(&self) -> LoadOutcome {
        {
            let mut state = self.inner.state.lock().await;
            if !state.pagination().has_next {
                return LoadOutcome::Skipped;
            }
            state.query.page += 1;
            state.bump();
        }
        self.load_data().await
    }

    pub async fn prev_page(&self) -> LoadOutcome {
        {
            let mut state = self.inner.state.lock().await;
            if state.query.page <= 1 {
                return LoadOutcome::Skipped;
            }
            state.query.page -= 1;
            state.bump();
        }
        self.load_data().await
    }

    pub async fn go_to_page(&self, page: u32) -> Result<LoadOutcome> {
        {
            let mut state = self.inner.state.lock().await;
            let pagination = state.pagination();
            let beyond = pagination.exact && page > pagination.total_pages;
            if page == 0 || beyond {
                return Err(AcademyError::InvalidInput(format!(
                    "página {} fora do intervalo 1–{}",
                    page, pagination.total_pages
                )));
            }
            if page == state.query.page {
                return Ok(LoadOutcome::Skipped);
            }
            state.query.page = page;
            state.bump();
        }
        Ok(self.load_data().await)
    }

    /// Search immediately, back on page 1
    pub async fn apply_search(&self, text: &str) -> LoadOutcome {
        {
            let mut state = self.inner.state.lock().await;
            state.query.set_search(text);
            state.bump();
        }
        self.load_data().await
    }

    /// Search after the input has been idle for the debounce delay
    pub fn search(&self, text: impl Into<String>) {
        let controller = self.clone();
        let text = text.into();
        self.inner.search_debounce.trigger(async move {
            controller.apply_search(&text).await;
        });
    }

    pub fn search_pending(&self) -> bool {
        self.inner.search_debounce.is_pending()
    }

    pub async fn set_filter(&self, key: &str, value: &str) -> Result<LoadOutcome> {
        {
            let mut state = self.inner.state.lock().await;
            state.query.set_filter::<R>(key, value)?;
            state.bump();
        }
        Ok(self.load_data().await)
    }

    pub async fn clear_filters(&self) -> LoadOutcome {
        self.inner.search_debounce.cancel();
        {
            let mut state = self.inner.state.lock().await;
            state.query.clear_filters();
            state.bump();
        }
        self.load_data().await
    }

    pub async fn set_sort(&self, field: &str, order: SortOrder) -> LoadOutcome {
        {
            let mut state = self.inner.state.lock().await;
            state.query.set_sort(field, order);
            state.bump();
        }
        self.load_data().await
    }

    /// Flip one row; returns whether it is now selected
    pub async fn toggle_one(&self, id: &str) -> bool {
        let mut state = self.inner.state.lock().await;
        let selected = state.selection.toggle(id);
        self.inner.view.render_selection(&state.selection);
        selected
    }

    /// Add every row of the current page
    pub async fn select_page(&self) -> usize {
        let mut state = self.inner.state.lock().await;
        let ids = state.page_ids();
        state.selection.select_many(ids);
        self.inner.view.render_selection(&state.selection);
        state.selection.len()
    }

    /// Select every record matching the query
    ///
    /// Resources without an ids endpoint select the current page only.
    pub async fn select_all(&self) -> Result<usize> {
        if !R::SUPPORTS_IDS {
            return Ok(self.select_page().await);
        }

        let query = self.inner.state.lock().await.query.filter_pairs();
        let ids = match self.inner.service.ids(&query).await {
            Ok(ids) => ids,
            Err(e) => {
                self.inner
                    .view
                    .notify(Toast::from_error("Erro ao selecionar todos", &e));
                return Err(e);
            }
        };

        let mut state = self.inner.state.lock().await;
        state.selection.select_all(ids);
        self.inner.view.render_selection(&state.selection);
        self.inner.view.notify(Toast::info(format!(
            "Selecionados: {}",
            count_label(state.selection.len(), R::SINGULAR, R::PLURAL)
        )));
        Ok(state.selection.len())
    }

    pub async fn deselect_all(&self) {
        let mut state = self.inner.state.lock().await;
        state.selection.clear();
        self.inner.view.render_selection(&state.selection);
    }

    /// Delete one record and reload; the caller confirms beforehand
    pub async fn delete_one(&self, id: &str) -> Result<()> {
        match self.inner.service.delete(id).await {
            Ok(()) => {
                log_admin_action(R::PLURAL, "delete", Some(id), None);
                self.inner.state.lock().await.selection.remove(id);
                self.inner.view.notify(Toast::success(format!(
                    "{} {} excluído(a) com sucesso",
                    capitalize(R::SINGULAR),
                    id
                )));
                self.reload().await;
                Ok(())
            }
            Err(e) => {
                self.inner
                    .view
                    .notify(Toast::from_error(&format!("Erro ao excluir {}", R::SINGULAR), &e));
                Err(e)
            }
        }
    }

    /// Delete every selected record, one request at a time
    ///
    /// Successes leave the selection; failures stay selected so the user can
    /// retry them. The list is reloaded afterwards.
    pub async fn delete_selected(&self) -> BulkDeleteReport {
        let ids = self.inner.state.lock().await.selection.ids();
        if ids.is_empty() {
            self.inner
                .view
                .notify(Toast::warning("Nenhum item selecionado"));
            return BulkDeleteReport::default();
        }

        let mut report = BulkDeleteReport::default();
        for (batch_no, batch) in ids.chunks(self.inner.batch_size).enumerate() {
            debug!(resource = R::PLURAL, batch = batch_no + 1, size = batch.len(), "Deleting batch");
            for id in batch {
                match self.inner.service.delete(id).await {
                    Ok(()) => {
                        report.succeeded += 1;
                        self.inner.state.lock().await.selection.remove(id);
                    }
                    Err(e) => {
                        warn!(resource = R::PLURAL, id = %id, error = %e, "Bulk delete item failed");
                        report.failed += 1;
                        report.errors.push((id.clone(), e.to_string()));
                    }
                }
            }
        }

        log_bulk_result(R::PLURAL, "delete", report.succeeded, report.failed);
        let toast = if report.failed == 0 {
            Toast::success(format!(
                "Exclusão concluída: {}",
                count_label(report.succeeded, R::SINGULAR, R::PLURAL)
            ))
        } else {
            Toast::warning(format!(
                "Exclusão parcial: {} excluídos, {} com erro",
                report.succeeded, report.failed
            ))
        };
        self.inner.view.notify(toast);

        self.reload().await;
        report
    }

    /// Switch table/cards, persist the choice and redraw
    pub async fn set_view_mode(&self, mode: ViewMode) {
        {
            let mut state = self.inner.state.lock().await;
            state.view_mode = mode;
            if !state.items.is_empty() {
                self.inner
                    .view
                    .render_items(&state.items, &state.selection, mode);
            }
        }

        if let Some(prefs) = &self.inner.preferences {
            if let Err(e) = prefs.set_view_mode(R::PLURAL, mode).await {
                warn!(resource = R::PLURAL, error = %e, "Failed to persist view mode");
            }
        }
    }

    /// Leave the screen: pending searches are cancelled, late responses dropped
    pub async fn detach(&self) {
        self.inner.search_debounce.cancel();
        let mut state = self.inner.state.lock().await;
        state.detached = true;
        debug!(resource = R::PLURAL, "List detached");
    }

    pub async fn items(&self) -> Vec<R> {
        self.inner.state.lock().await.items.clone()
    }

    pub async fn total(&self) -> u64 {
        self.inner.state.lock().await.total
    }

    pub async fn query(&self) -> ListQuery {
        self.inner.state.lock().await.query.clone()
    }

    pub async fn current_page(&self) -> u32 {
        self.inner.state.lock().await.query.page
    }

    pub async fn pagination(&self) -> Pagination {
        self.inner.state.lock().await.pagination()
    }

    pub async fn stats(&self) -> ListStats {
        self.inner.state.lock().await.stats()
    }

    pub async fn selection(&self) -> Selection {
        self.inner.state.lock().await.selection.clone()
    }

    pub async fn view_mode(&self) -> ViewMode {
        self.inner.state.lock().await.view_mode
    }

    pub async fn is_loading(&self) -> bool {
        let state = self.inner.state.lock().await;
        state.in_flight == Some(state.generation)
    }

    pub async fn last_error(&self) -> Option<String> {
        self.inner.state.lock().await.last_error.clone()
    }

    /// Page items and total, resolving a missing count
    ///
    /// Without pagination metadata the total is either fetched from the count
    /// endpoint or reported as the lower bound known from this page.
    async fn fetch_page(&self, query: &ListQuery) -> Result<(Vec<R>, u64, bool)> {
        let page = self.inner.service.list(&query.to_pairs()).await?;
        if let Some(meta) = page.meta {
            return Ok((page.items, meta.count, true));
        }

        let lower_bound = calculate_offset(query.page, query.page_size) + page.items.len() as u64;
        warn!(
            resource = R::PLURAL,
            path = R::PATH,
            "Backend omitted pagination metadata"
        );

        if R::SUPPORTS_COUNT {
            match self.inner.service.count(&query.filter_pairs()).await {
                Ok(count) => return Ok((page.items, count.max(lower_bound), true)),
                Err(e) => {
                    warn!(resource = R::PLURAL, error = %e, "Count fallback failed, total is a lower bound");
                }
            }
        }

        Ok((page.items, lower_bound, false))
    }

    fn render(&self, state: &ListState<R>) {
        let view = &self.inner.view;
        if state.items.is_empty() {
            view.render_empty(&state.query);
        } else {
            view.render_items(&state.items, &state.selection, state.view_mode);
        }
        view.render_pagination(&state.pagination());
        view.render_stats(&state.stats());
        view.render_selection(&state.selection);
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("atividade"), "Atividade");
        assert_eq!(capitalize("ênfase"), "Ênfase");
        assert_eq!(capitalize(""), "");
    }
}
