//! Console session: the mounted screen and command dispatch

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::commands::{is_confirmation, Command, HELP};
use crate::editor::{EntityEditor, FormResource};
use crate::list::{EntityListController, LoadOutcome};
use crate::models::{Activity, Resource, Student, TimeSlot, Unit};
use crate::router::Route;
use crate::state::AppContext;
use crate::transfer::{
    export_students_csv, export_techniques, import_stats, import_techniques, read_techniques_file,
};
use crate::ui::{Console, Notifier, TerminalEditorView, TerminalListView, Toast};
use crate::utils::errors::{AcademyError, Result};

type ListScreen<R> = EntityListController<R, TerminalListView<R>>;
type EditorScreen<R> = EntityEditor<R, TerminalEditorView>;

struct PersonalScreen {
    student: Student,
    date: Option<String>,
    slots: Vec<TimeSlot>,
}

enum Screen {
    Home,
    Activities(ListScreen<Activity>),
    Units(ListScreen<Unit>),
    Students(ListScreen<Student>),
    ActivityEditor(EditorScreen<Activity>),
    UnitEditor(EditorScreen<Unit>),
    StudentEditor(EditorScreen<Student>),
    Personal(Box<PersonalScreen>),
}

/// Command waiting for a `y/N` answer
enum Pending {
    Command(Command),
    DiscardChanges,
    /// Open another route, dropping the unsaved form
    Leave(Route),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    ctx: AppContext,
    console: Arc<Console>,
    screen: Screen,
    route: Option<Route>,
    pending: Option<Pending>,
}

impl Session {
    pub fn new(ctx: AppContext, console: Arc<Console>) -> Self {
        Self {
            ctx,
            console,
            screen: Screen::Home,
            route: None,
            pending: None,
        }
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn prompt(&self) -> String {
        match (&self.pending, &self.route) {
            (Some(_), _) => "(y/N)> ".to_string(),
            (None, Some(route)) => format!("{}> ", route),
            (None, None) => "> ".to_string(),
        }
    }

    /// Handle one input line, reporting failures as toasts
    pub async fn dispatch(&mut self, line: &str) -> Flow {
        match self.handle_line(line).await {
            Ok(flow) => flow,
            Err(e) => {
                debug!(error = %e, "Command failed");
                let toast = match &e {
                    AcademyError::InvalidInput(message) => Toast::warning(message.clone()),
                    other => Toast::from_error("Erro", other),
                };
                self.ctx.notifier.notify(toast);
                Flow::Continue
            }
        }
    }

    pub async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();

        if let Some(pending) = self.pending.take() {
            if !is_confirmation(line) {
                self.console.line("Operação cancelada");
                return Ok(Flow::Continue);
            }
            match pending {
                Pending::Command(command) => self.execute(command).await?,
                Pending::DiscardChanges => self.leave_editor(true).await?,
                Pending::Leave(route) => self.open(route).await?,
            }
            return Ok(Flow::Continue);
        }

        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let command: Command = line.parse()?;
        debug!(command = command.name(), "Command received");
        let unsaved = self.editor_dirty().await;
        match command {
            Command::Quit => {
                self.close_screen().await;
                Ok(Flow::Quit)
            }
            Command::Help => {
                for help_line in HELP.lines() {
                    self.console.line(help_line);
                }
                Ok(Flow::Continue)
            }
            command if command.is_destructive() && self.is_list_screen() => {
                self.console.line(confirmation_question(&command));
                self.pending = Some(Pending::Command(command));
                Ok(Flow::Continue)
            }
            Command::Go(route) if unsaved => {
                self.console
                    .line("Existem alterações não salvas. Descartar? (y/N)");
                self.pending = Some(Pending::Leave(route));
                Ok(Flow::Continue)
            }
            Command::Cancel if self.is_editor_screen() => {
                self.leave_editor(false).await?;
                Ok(Flow::Continue)
            }
            command => {
                self.execute(command).await?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Mount the screen behind `route`, leaving the current one
    pub async fn open(&mut self, route: Route) -> Result<()> {
        self.close_screen().await;
        info!(route = %route, "Opening screen");

        let services = Arc::clone(&self.ctx.services);
        let prefs = Some(Arc::clone(&self.ctx.preferences));
        let list_config = self.ctx.settings.list.clone();
        let editor_config = self.ctx.settings.editor.clone();

        self.screen = match &route {
            Route::Activities => {
                let list = EntityListController::new(
                    services.activities.clone(),
                    TerminalListView::new(Arc::clone(&self.console)),
                    &list_config,
                    prefs,
                );
                list.mount().await;
                Screen::Activities(list)
            }
            Route::Units => {
                let list = EntityListController::new(
                    services.units.resource().clone(),
                    TerminalListView::new(Arc::clone(&self.console)),
                    &list_config,
                    prefs,
                );
                list.mount().await;
                Screen::Units(list)
            }
            Route::Students => {
                let list = EntityListController::new(
                    services.students.resource().clone(),
                    TerminalListView::new(Arc::clone(&self.console)),
                    &list_config,
                    prefs,
                );
                list.mount().await;
                Screen::Students(list)
            }
            Route::NewActivity | Route::EditActivity(_) => {
                let editor = EntityEditor::new(
                    services.activities.clone(),
                    TerminalEditorView::new(Arc::clone(&self.console)),
                    &editor_config,
                    prefs,
                );
                Screen::ActivityEditor(editor)
            }
            Route::NewUnit | Route::EditUnit(_) => {
                let editor = EntityEditor::new(
                    services.units.resource().clone(),
                    TerminalEditorView::new(Arc::clone(&self.console)),
                    &editor_config,
                    prefs,
                );
                Screen::UnitEditor(editor)
            }
            Route::NewStudent | Route::EditStudent(_) => {
                let editor = EntityEditor::new(
                    services.students.resource().clone(),
                    TerminalEditorView::new(Arc::clone(&self.console)),
                    &editor_config,
                    prefs,
                );
                Screen::StudentEditor(editor)
            }
            Route::StudentPersonal(id) => match self.open_personal(id).await {
                Ok(screen) => Screen::Personal(Box::new(screen)),
                Err(e) => {
                    self.ctx
                        .notifier
                        .notify(Toast::from_error("Erro ao carregar estudante", &e));
                    return Box::pin(self.open(Route::Students)).await;
                }
            },
        };
        self.route = Some(route.clone());

        let edit_id = match &route {
            Route::EditActivity(id) | Route::EditUnit(id) | Route::EditStudent(id) => Some(id.as_str()),
            _ => None,
        };
        let loaded = match (&self.screen, edit_id) {
            (Screen::ActivityEditor(editor), id) => open_editor(editor, id).await,
            (Screen::UnitEditor(editor), id) => open_editor(editor, id).await,
            (Screen::StudentEditor(editor), id) => open_editor(editor, id).await,
            _ => Ok(()),
        };
        if loaded.is_err() {
            // the editor already notified and asked to go back
            return self.follow_editor_navigation().await;
        }
        Ok(())
    }

    async fn close_screen(&mut self) {
        match &self.screen {
            Screen::Activities(list) => list.detach().await,
            Screen::Units(list) => list.detach().await,
            Screen::Students(list) => list.detach().await,
            Screen::ActivityEditor(editor) => editor.detach().await,
            Screen::UnitEditor(editor) => editor.detach().await,
            Screen::StudentEditor(editor) => editor.detach().await,
            Screen::Home | Screen::Personal(_) => {}
        }
        self.screen = Screen::Home;
    }

    async fn editor_dirty(&self) -> bool {
        match &self.screen {
            Screen::ActivityEditor(editor) => editor.is_dirty().await,
            Screen::UnitEditor(editor) => editor.is_dirty().await,
            Screen::StudentEditor(editor) => editor.is_dirty().await,
            _ => false,
        }
    }

    fn is_list_screen(&self) -> bool {
        matches!(
            self.screen,
            Screen::Activities(_) | Screen::Units(_) | Screen::Students(_)
        )
    }

    fn is_editor_screen(&self) -> bool {
        matches!(
            self.screen,
            Screen::ActivityEditor(_) | Screen::UnitEditor(_) | Screen::StudentEditor(_)
        )
    }

    async fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Go(route) => return self.open(route).await,
            Command::Health => {
                let health = self.ctx.services.health_check().await;
                if health.is_healthy() {
                    self.console
                        .line(format!("Servidor disponível ({} ms)", health.latency_ms));
                } else {
                    for issue in health.get_issues() {
                        self.console.line(issue);
                    }
                }
                return Ok(());
            }
            _ => {}
        }

        match &self.screen {
            Screen::Home => Err(AcademyError::InvalidInput(
                "nenhuma tela aberta; use uma rota como #/activities".to_string(),
            )),
            Screen::Activities(list) => match command {
                Command::Export => self.export_activities().await,
                Command::Import(path) => {
                    let list = list.clone();
                    self.import_activities(&path).await?;
                    list.reload().await;
                    Ok(())
                }
                command => run_list(list, command).await,
            },
            Screen::Units(list) => match command {
                Command::Export | Command::Import(_) => Err(AcademyError::InvalidInput(
                    "importação e exportação não disponíveis para unidades".to_string(),
                )),
                command => run_list(list, command).await,
            },
            Screen::Students(list) => match command {
                Command::Export => self.export_students().await,
                Command::Import(_) => Err(AcademyError::InvalidInput(
                    "importação não disponível para estudantes".to_string(),
                )),
                command => run_list(list, command).await,
            },
            Screen::ActivityEditor(editor) => {
                run_editor(editor, command).await?;
                self.follow_editor_navigation().await
            }
            Screen::UnitEditor(editor) => {
                run_editor(editor, command).await?;
                self.follow_editor_navigation().await
            }
            Screen::StudentEditor(editor) => {
                run_editor(editor, command).await?;
                self.follow_editor_navigation().await
            }
            Screen::Personal(_) => self.run_personal(command).await,
        }
    }

    /// Cancel the editor; asks before discarding unsaved changes
    async fn leave_editor(&mut self, force: bool) -> Result<()> {
        let left = match &self.screen {
            Screen::ActivityEditor(editor) => editor.cancel(force).await,
            Screen::UnitEditor(editor) => editor.cancel(force).await,
            Screen::StudentEditor(editor) => editor.cancel(force).await,
            _ => true,
        };
        if !left {
            self.console
                .line("Existem alterações não salvas. Descartar? (y/N)");
            self.pending = Some(Pending::DiscardChanges);
            return Ok(());
        }
        self.follow_editor_navigation().await
    }

    /// Open the list screen when the editor asked to leave
    async fn follow_editor_navigation(&mut self) -> Result<()> {
        let leave = match &self.screen {
            Screen::ActivityEditor(editor) => editor.view().take_navigation(),
            Screen::UnitEditor(editor) => editor.view().take_navigation(),
            Screen::StudentEditor(editor) => editor.view().take_navigation(),
            _ => false,
        };
        match (&self.route, leave) {
            (Some(route), true) => {
                let target = route.list_route();
                Box::pin(self.open(target)).await
            }
            _ => Ok(()),
        }
    }

    async fn export_activities(&self) -> Result<()> {
        let result = export_techniques(
            &self.ctx.services.activities,
            self.ctx.settings.list.max_page_size,
            &self.ctx.export_dir(),
            Utc::now(),
        )
        .await;

        match result {
            Ok(Some(summary)) => self.ctx.notifier.notify(Toast::success(format!(
                "{} técnicas exportadas para {}",
                summary.count,
                summary.path.display()
            ))),
            Ok(None) => self
                .ctx
                .notifier
                .notify(Toast::warning("Nenhuma técnica encontrada para exportar")),
            Err(e) => self
                .ctx
                .notifier
                .notify(Toast::from_error("Erro ao exportar técnicas", &e)),
        }
        Ok(())
    }

    async fn export_students(&self) -> Result<()> {
        let query = [
            ("page".to_string(), "1".to_string()),
            (
                "pageSize".to_string(),
                self.ctx.settings.list.max_page_size.to_string(),
            ),
        ];
        let result = match self.ctx.services.students.resource().list(&query).await {
            Ok(page) => export_students_csv(&page.items, &self.ctx.export_dir(), Utc::now()).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(summary) => self.ctx.notifier.notify(Toast::success(format!(
                "{} estudantes exportados para {}",
                summary.count,
                summary.path.display()
            ))),
            Err(e) => self
                .ctx
                .notifier
                .notify(Toast::from_error("Erro ao exportar estudantes", &e)),
        }
        Ok(())
    }

    async fn import_activities(&self, path: &Path) -> Result<()> {
        let techniques = match read_techniques_file(path).await {
            Ok(techniques) => techniques,
            Err(e) => {
                self.ctx
                    .notifier
                    .notify(Toast::from_error("Erro ao importar técnicas", &e));
                return Ok(());
            }
        };

        let stats = import_stats(&techniques);
        self.console.line(format!(
            "{} técnicas | tipos: {} | categorias: {} | dificuldade média: {:.1}",
            stats.total,
            stats
                .type_count
                .iter()
                .map(|(kind, count)| format!("{} ({})", kind, count))
                .collect::<Vec<_>>()
                .join(", "),
            stats.categories.len(),
            stats.avg_difficulty
        ));

        let console = Arc::clone(&self.console);
        let report = import_techniques(
            &self.ctx.services.activities,
            &techniques,
            self.ctx.settings.import.batch_size,
            |progress| {
                console.line(format!("[{}/{}] {}", progress.done, progress.total, progress.status));
            },
        )
        .await;

        let toast = if report.failed == 0 {
            Toast::success(report.summary())
        } else {
            Toast::warning(report.summary())
        };
        self.ctx.notifier.notify(toast);

        let (shown, more) = report.shown_errors();
        for error in shown {
            self.console.line(format!("  - {}", error));
        }
        if more > 0 {
            self.console.line(format!("  ... e mais {} erros", more));
        }
        Ok(())
    }

    async fn open_personal(&self, student_id: &str) -> Result<PersonalScreen> {
        let student = self.ctx.services.students.resource().get(student_id).await?;
        self.console
            .line(format!("Personal training de {}", student.full_name()));

        match self
            .ctx
            .services
            .personal_training
            .classes_for_student(student_id)
            .await
        {
            Ok(classes) if classes.is_empty() => {
                self.console.line("Nenhuma aula personal cadastrada");
            }
            Ok(classes) => {
                for class in classes {
                    self.console.line(format!(
                        "  #{} {} ({} min)",
                        class.id.as_deref().unwrap_or("-"),
                        class.title,
                        class.duration.unwrap_or(60)
                    ));
                }
            }
            Err(e) => {
                warn!(student_id = %student_id, error = %e, "Personal classes unavailable");
                self.ctx
                    .notifier
                    .notify(Toast::from_error("Erro ao carregar aulas personal", &e));
            }
        }

        Ok(PersonalScreen {
            student,
            date: None,
            slots: Vec::new(),
        })
    }

    async fn run_personal(&mut self, command: Command) -> Result<()> {
        let Screen::Personal(screen) = &mut self.screen else {
            return Ok(());
        };
        let service = &self.ctx.services.personal_training;

        match command {
            Command::Instructors => {
                let instructors = match service.available_instructors().await {
                    Ok(instructors) => instructors,
                    Err(e) => {
                        self.ctx
                            .notifier
                            .notify(Toast::from_error("Erro ao carregar instrutores", &e));
                        return Ok(());
                    }
                };
                if instructors.is_empty() {
                    self.console.line("Nenhum instrutor disponível");
                }
                for instructor in instructors {
                    self.console.line(format!(
                        "  #{} {} {}",
                        instructor.id.as_deref().unwrap_or("-"),
                        instructor.name,
                        instructor.specialties.join(", ")
                    ));
                }
                Ok(())
            }
            Command::Slots { instructor, date } => {
                chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
                    AcademyError::InvalidInput(format!("data inválida: {}", date))
                })?;
                let slots = match service.available_slots(&instructor, &date).await {
                    Ok(slots) => slots,
                    Err(e) => {
                        self.ctx
                            .notifier
                            .notify(Toast::from_error("Erro ao carregar horários", &e));
                        return Ok(());
                    }
                };

                screen.slots = slots
                    .into_iter()
                    .filter(|s| s.available)
                    .map(|mut s| {
                        s.instructor_id.get_or_insert_with(|| instructor.clone());
                        s
                    })
                    .collect();
                screen.date = Some(date);

                if screen.slots.is_empty() {
                    self.console.line("Nenhum horário disponível nesta data");
                }
                for (index, slot) in screen.slots.iter().enumerate() {
                    self.console.line(format!(
                        "  {}. {}–{} {}",
                        index + 1,
                        slot.start_time,
                        slot.end_time,
                        slot.instructor_name.as_deref().unwrap_or("")
                    ));
                }
                Ok(())
            }
            Command::Book(number) => {
                let (Some(date), Some(slot)) = (
                    screen.date.clone(),
                    number.checked_sub(1).and_then(|i| screen.slots.get(i)).cloned(),
                ) else {
                    return Err(AcademyError::InvalidInput(
                        "escolha um horário listado por 'slots'".to_string(),
                    ));
                };

                match service.book_slot(&screen.student, &slot, &date).await {
                    Ok(_) => {
                        screen.slots.retain(|s| s != &slot);
                        self.ctx.notifier.notify(Toast::success(format!(
                            "Sessão agendada para {} às {}",
                            date, slot.start_time
                        )));
                    }
                    Err(e) => self
                        .ctx
                        .notifier
                        .notify(Toast::from_error("Erro ao agendar sessão", &e)),
                }
                Ok(())
            }
            Command::Cancel => {
                let target = Route::EditStudent(screen.student.id.clone().unwrap_or_default());
                self.open(target).await
            }
            other => Err(unsupported(&other)),
        }
    }
}

fn unsupported(command: &Command) -> AcademyError {
    AcademyError::InvalidInput(format!(
        "'{}' não está disponível nesta tela",
        command.name()
    ))
}

fn confirmation_question(command: &Command) -> String {
    match command {
        Command::Delete(id) => format!("Excluir o registro {}? Esta ação não pode ser desfeita. (y/N)", id),
        _ => "Excluir todos os itens selecionados? Esta ação não pode ser desfeita. (y/N)".to_string(),
    }
}

async fn open_editor<R: FormResource>(editor: &EditorScreen<R>, id: Option<&str>) -> Result<()> {
    match id {
        Some(id) => editor.load_entity(id).await,
        None => {
            editor.open_create().await;
            Ok(())
        }
    }
}

/// Commands shared by every list screen
async fn run_list<R: Resource>(list: &ListScreen<R>, command: Command) -> Result<()> {
    let outcome = match command {
        Command::Next => list.next_page().await,
        Command::Prev => list.prev_page().await,
        Command::Page(page) => list.go_to_page(page).await?,
        Command::Search(text) => list.apply_search(&text).await,
        Command::Filter { key, value } => list.set_filter(&key, &value).await?,
        Command::Clear => list.clear_filters().await,
        Command::Sort { field, order } => list.set_sort(&field, order).await,
        Command::Reload => list.reload().await,
        Command::Select(id) => {
            if !list.selection().await.contains(&id) {
                list.toggle_one(&id).await;
            }
            return Ok(());
        }
        Command::Unselect(id) => {
            if list.selection().await.contains(&id) {
                list.toggle_one(&id).await;
            }
            return Ok(());
        }
        Command::SelectPage => {
            list.select_page().await;
            return Ok(());
        }
        Command::SelectAll => {
            // failures are already shown by the list
            let _ = list.select_all().await;
            return Ok(());
        }
        Command::Deselect => {
            list.deselect_all().await;
            return Ok(());
        }
        Command::Delete(id) => {
            let _ = list.delete_one(&id).await;
            return Ok(());
        }
        Command::DeleteSelected => {
            let report = list.delete_selected().await;
            debug!(succeeded = report.succeeded, failed = report.failed, "Bulk delete finished");
            return Ok(());
        }
        Command::View(mode) => {
            list.set_view_mode(mode).await;
            return Ok(());
        }
        other => return Err(unsupported(&other)),
    };

    if outcome == LoadOutcome::Skipped {
        debug!(resource = R::PLURAL, "Nothing to load");
    }
    Ok(())
}

/// Commands shared by every editor screen
async fn run_editor<R: FormResource>(editor: &EditorScreen<R>, command: Command) -> Result<()> {
    match command {
        Command::Set { field, value } => editor.set_field(&field, &value).await,
        Command::Save => {
            // failures are already shown next to the fields and as a toast
            if let Err(e) = editor.save().await {
                debug!(resource = R::SINGULAR, error = %e, "Save failed");
            }
            Ok(())
        }
        Command::Cancel => {
            editor.cancel(true).await;
            Ok(())
        }
        other => Err(unsupported(&other)),
    }
}
