//! Generic create/edit form controller

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::form::FormState;
use super::schema::FormResource;
use super::validation::{map_server_errors, validate_field, validate_form};
use super::view::{EditorMode, EditorView, SaveStatus};
use crate::config::EditorConfig;
use crate::services::resource::created_id;
use crate::services::ResourceService;
use crate::state::PreferenceStore;
use crate::ui::notification::Toast;
use crate::utils::debounce::Debouncer;
use crate::utils::errors::{summarize_field_errors, AcademyError, FieldError, Result};
use crate::utils::logging::{log_admin_action, log_api_error};

/// Result of a successful `save`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created { id: Option<String> },
    Updated { id: String },
}

struct EditorState {
    mode: EditorMode,
    form: FormState,
    /// Set once the screen is left; late auto-saves are dropped
    detached: bool,
    /// Bumped on every edit so a finished save knows if newer edits exist
    revision: u64,
}

struct Inner<R: FormResource, V> {
    service: ResourceService<R>,
    view: V,
    preferences: Option<Arc<PreferenceStore>>,
    auto_save: Option<Debouncer>,
    state: Mutex<EditorState>,
    /// Held for the whole request by explicit saves and auto-saves
    save_lock: Mutex<()>,
}

pub struct EntityEditor<R: FormResource, V: EditorView> {
    inner: Arc<Inner<R, V>>,
}

impl<R: FormResource, V: EditorView> Clone for EntityEditor<R, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: FormResource, V: EditorView> EntityEditor<R, V> {
    pub fn new(
        service: ResourceService<R>,
        view: V,
        config: &EditorConfig,
        preferences: Option<Arc<PreferenceStore>>,
    ) -> Self {
        let auto_save = (R::AUTO_SAVE && config.auto_save).then(|| {
            Debouncer::new("editor-auto-save", Duration::from_millis(config.auto_save_idle_ms))
        });

        Self {
            inner: Arc::new(Inner {
                service,
                view,
                preferences,
                auto_save,
                state: Mutex::new(EditorState {
                    mode: EditorMode::Create,
                    form: FormState::new(),
                    detached: false,
                    revision: 0,
                }),
                save_lock: Mutex::new(()),
            }),
        }
    }

    pub fn view(&self) -> &V {
        &self.inner.view
    }

    /// Blank form, restoring an unsaved draft if one exists
    pub async fn open_create(&self) {
        self.cancel_auto_save();
        let draft = match &self.inner.preferences {
            Some(prefs) => prefs.draft(R::draft_key()).await,
            None => None,
        };

        let mut state = self.inner.state.lock().await;
        state.mode = EditorMode::Create;
        state.form = match draft {
            Some(values) if !values.is_empty() => {
                debug!(resource = R::SINGULAR, fields = values.len(), "Draft restored");
                self.inner.view.notify(Toast::info("Rascunho restaurado"));
                FormState::from_values(values)
            }
            _ => FormState::new(),
        };
        state.revision += 1;
        self.inner.view.render_form(&state.mode, R::fields(), &state.form);
        self.inner.view.render_field_errors(&[]);
    }

    /// Fetch an entity and switch to edit mode
    ///
    /// On failure the user is notified and sent back to the list.
    pub async fn load_entity(&self, id: &str) -> Result<()> {
        self.cancel_auto_save();
        self.inner.view.show_loading(true);
        let result = self.inner.service.get_raw(id).await;
        self.inner.view.show_loading(false);

        match result {
            Ok(entity) => {
                let mut state = self.inner.state.lock().await;
                state.mode = EditorMode::Edit { id: id.to_string() };
                state.form = FormState::from_entity(R::fields(), &entity);
                state.revision += 1;
                self.inner.view.render_form(&state.mode, R::fields(), &state.form);
                self.inner.view.render_field_errors(&[]);
                info!(resource = R::SINGULAR, id = %id, "Entity loaded into editor");
                Ok(())
            }
            Err(e) => {
                if let AcademyError::HttpStatus { status, body } = &e {
                    warn!(resource = R::SINGULAR, id = %id, status = status, body = %body, "Load failed");
                }
                log_api_error(&R::item_path(id), &e, Some("load_entity"));
                self.inner
                    .view
                    .notify(Toast::from_error(&format!("Erro ao carregar {}", R::SINGULAR), &e));
                self.inner.view.navigate_to_list();
                Err(e)
            }
        }
    }

    /// Change one field, keep drafts and arm auto-save
    pub async fn set_field(&self, name: &str, value: &str) -> Result<()> {
        let field = R::field(name).ok_or_else(|| {
            AcademyError::InvalidInput(format!("campo desconhecido: {}", name))
        })?;

        let (mode, draft) = {
            let mut state = self.inner.state.lock().await;
            state.form.set(name, value);
            state.revision += 1;

            let mut errors = current_errors(&state.form);
            if let Some(message) = validate_field(field, &state.form.normalized(field)) {
                errors.push(FieldError::new(field.name, message));
                state.form.set_errors(&errors);
            }
            self.inner.view.render_field_errors(&errors);
            self.inner.view.set_save_status(SaveStatus::Unsaved);
            (state.mode.clone(), state.form.values().clone())
        };

        match mode {
            EditorMode::Create => {
                if let Some(prefs) = &self.inner.preferences {
                    if let Err(e) = prefs.save_draft(R::draft_key(), draft).await {
                        warn!(resource = R::SINGULAR, error = %e, "Failed to store draft");
                    }
                }
            }
            EditorMode::Edit { .. } => self.arm_auto_save(),
        }
        Ok(())
    }

    /// Check every field, annotate the invalid ones and summarise them
    pub async fn validate_form(&self) -> Vec<FieldError> {
        let mut state = self.inner.state.lock().await;
        let errors = validate_form(R::fields(), &state.form);
        state.form.set_errors(&errors);
        self.inner.view.render_field_errors(&errors);
        if !errors.is_empty() {
            self.inner.view.notify(Toast::warning(format!(
                "Corrija os campos: {}",
                summarize_field_errors(&errors)
            )));
        }
        errors
    }

    /// POST in create mode, PUT in edit mode
    ///
    /// Invalid forms are never sent. A running auto-save is awaited first,
    /// then the current form is sent. The submit control is disabled while
    /// the request runs and re-enabled on every path.
    pub async fn save(&self) -> Result<SaveOutcome> {
        let _saving = self.inner.save_lock.lock().await;
        self.cancel_auto_save();

        let errors = self.validate_form().await;
        if !errors.is_empty() {
            return Err(AcademyError::Validation(errors));
        }

        let (mode, body, revision) = {
            let state = self.inner.state.lock().await;
            let body = match &state.mode {
                EditorMode::Create => state.form.payload(R::fields()),
                EditorMode::Edit { .. } => state.form.update_payload(R::fields()),
            };
            (state.mode.clone(), body, state.revision)
        };

        self.inner.view.set_submit_enabled(false);
        self.inner.view.set_save_status(SaveStatus::Saving);

        let result = match &mode {
            EditorMode::Create => self.inner.service.create(&body).await,
            EditorMode::Edit { id } => self.inner.service.update(id, &body).await,
        };

        {
            let mut state = self.inner.state.lock().await;
            if result.is_ok() && state.revision == revision {
                state.form.mark_clean();
            }
        }
        self.inner.view.set_submit_enabled(true);

        match result {
            Ok(data) => {
                self.inner.view.set_save_status(SaveStatus::Saved);
                self.inner.view.render_field_errors(&[]);
                match mode {
                    EditorMode::Create => {
                        let id = created_id(&data);
                        log_admin_action(R::PLURAL, "create", id.as_deref(), None);
                        if let Some(prefs) = &self.inner.preferences {
                            if let Err(e) = prefs.clear_draft(R::draft_key()).await {
                                warn!(resource = R::SINGULAR, error = %e, "Failed to clear draft");
                            }
                        }
                        self.inner.view.notify(Toast::success(R::CREATED_MESSAGE));
                        self.inner.view.navigate_to_list();
                        Ok(SaveOutcome::Created { id })
                    }
                    EditorMode::Edit { id } => {
                        log_admin_action(R::PLURAL, "update", Some(&id), None);
                        self.inner.view.notify(Toast::success(R::UPDATED_MESSAGE));
                        Ok(SaveOutcome::Updated { id })
                    }
                }
            }
            Err(e) => {
                self.inner.view.set_save_status(SaveStatus::Failed);
                let server_errors = e.field_errors();
                if !server_errors.is_empty() {
                    let mapped = map_server_errors(R::fields(), server_errors);
                    let mut state = self.inner.state.lock().await;
                    state.form.set_errors(&mapped);
                    self.inner.view.render_field_errors(&mapped);
                }
                log_api_error(R::PATH, &e, Some("save"));
                self.inner
                    .view
                    .notify(Toast::from_error(&format!("Erro ao salvar {}", R::SINGULAR), &e));
                Err(e)
            }
        }
    }

    /// Change mode without leaving the screen
    pub async fn switch_mode(&self, mode: EditorMode) -> Result<()> {
        match mode {
            EditorMode::Create => {
                self.open_create().await;
                Ok(())
            }
            EditorMode::Edit { id } => self.load_entity(&id).await,
        }
    }

    /// Leave the editor; refuses when unsaved changes exist unless `force`
    ///
    /// Returns whether the editor was left.
    pub async fn cancel(&self, force: bool) -> bool {
        let dirty = self.inner.state.lock().await.form.is_dirty();
        if dirty && !force {
            return false;
        }
        self.cancel_auto_save();
        self.inner.view.navigate_to_list();
        true
    }

    /// Stop background work when the screen is left without `cancel`
    pub async fn detach(&self) {
        self.cancel_auto_save();
        self.inner.state.lock().await.detached = true;
        debug!(resource = R::SINGULAR, "Editor detached");
    }

    pub async fn mode(&self) -> EditorMode {
        self.inner.state.lock().await.mode.clone()
    }

    pub async fn form(&self) -> FormState {
        self.inner.state.lock().await.form.clone()
    }

    pub async fn is_dirty(&self) -> bool {
        self.inner.state.lock().await.form.is_dirty()
    }

    pub fn auto_save_pending(&self) -> bool {
        self.inner.auto_save.as_ref().is_some_and(Debouncer::is_pending)
    }

    fn arm_auto_save(&self) {
        if let Some(debouncer) = &self.inner.auto_save {
            let editor = self.clone();
            debouncer.trigger(async move {
                editor.auto_save_now().await;
            });
        }
    }

    fn cancel_auto_save(&self) {
        if let Some(debouncer) = &self.inner.auto_save {
            debouncer.cancel();
        }
    }

    /// Background PUT of a dirty, valid form in edit mode; last write wins
    async fn auto_save_now(&self) {
        let _saving = self.inner.save_lock.lock().await;
        let (id, body, revision) = {
            let state = self.inner.state.lock().await;
            let id = match &state.mode {
                EditorMode::Edit { id } => id.clone(),
                EditorMode::Create => return,
            };
            // an explicit save may have sent this revision while we waited
            if state.detached || !state.form.is_dirty() {
                return;
            }
            if !validate_form(R::fields(), &state.form).is_empty() {
                debug!(resource = R::SINGULAR, id = %id, "Auto-save skipped, form invalid");
                return;
            }
            (id, state.form.update_payload(R::fields()), state.revision)
        };

        let result = self.inner.service.update(&id, &body).await;

        let mut state = self.inner.state.lock().await;
        match result {
            Ok(_) => {
                if state.revision == revision {
                    state.form.mark_clean();
                }
                debug!(resource = R::SINGULAR, id = %id, "Auto-saved");
                self.inner.view.set_save_status(SaveStatus::AutoSaved);
            }
            Err(e) => {
                warn!(resource = R::SINGULAR, id = %id, error = %e, "Auto-save failed");
                self.inner.view.set_save_status(SaveStatus::AutoSaveFailed);
            }
        }
    }
}

fn current_errors(form: &FormState) -> Vec<FieldError> {
    form.errors()
        .iter()
        .map(|(f, m)| FieldError::new(f.clone(), m.clone()))
        .collect()
}
