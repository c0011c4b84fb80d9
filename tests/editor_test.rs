//! Integration tests for the generic editor

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use academy_admin::editor::{EditorMode, EntityEditor, SaveOutcome, SaveStatus};
use academy_admin::models::{Activity, Student, Unit};
use academy_admin::services::ResourceService;
use academy_admin::state::PreferenceStore;
use academy_admin::ui::ToastLevel;
use academy_admin::utils::errors::AcademyError;
use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use helpers::*;

fn editor<R: academy_admin::editor::FormResource>(
    ctx: &TestContext,
    prefs: Option<Arc<PreferenceStore>>,
) -> EntityEditor<R, RecordingEditorView> {
    EntityEditor::new(
        ResourceService::new(ctx.client.clone()),
        RecordingEditorView::new(),
        &ctx.settings.editor,
        prefs,
    )
}

#[tokio::test]
async fn test_create_unit_sends_cleaned_values() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_status("POST", "/api/units", 201, ok_envelope(json!({"id": "u9"})))
        .await;

    let unit = editor::<Unit>(&ctx, None);
    unit.open_create().await;
    unit.set_field("name", "Unidade Paulista").await.unwrap();
    unit.set_field("phone", "(11) 98765-4321").await.unwrap();
    unit.set_field("state", "sp").await.unwrap();
    unit.set_field("zipcode", "01310-100").await.unwrap();

    let outcome = unit.save().await.unwrap();
    assert_eq!(outcome, SaveOutcome::Created { id: Some("u9".to_string()) });

    let bodies = ctx.backend.bodies("POST", "/api/units").await;
    assert_eq!(
        bodies,
        vec![json!({
            "name": "Unidade Paulista",
            "phone": "11987654321",
            "state": "SP",
            "zipcode": "01310100"
        })]
    );

    let view = unit.view();
    assert!(view.navigated());
    assert_eq!(view.toasts().last().unwrap().message, "Unidade criada com sucesso!");
    assert!(view.statuses().contains(&SaveStatus::Saved));
    // submit is disabled during the request and enabled again afterwards
    let submits: Vec<_> = view
        .events()
        .into_iter()
        .filter(|e| matches!(e, EditorEvent::Submit(_)))
        .collect();
    assert_eq!(submits, vec![EditorEvent::Submit(false), EditorEvent::Submit(true)]);
    assert!(!unit.is_dirty().await);
}

#[tokio::test]
async fn test_server_validation_error_marks_field() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_get("/api/students/7", ok_envelope(student_json(7, "Ana", "Costa")))
        .await;
    ctx.backend
        .mock_status(
            "PUT",
            "/api/students/7",
            400,
            json!({
                "success": false,
                "error": "Validation failed",
                "details": [{"path": ["email"], "message": "Email inválido"}]
            }),
        )
        .await;

    let student = editor::<Student>(&ctx, None);
    student.load_entity("7").await.unwrap();
    assert_eq!(student.mode().await, EditorMode::Edit { id: "7".to_string() });
    assert_eq!(student.form().await.get("user.firstName"), "Ana");

    student.set_field("user.email", "ana.costa@ex.com").await.unwrap();
    let result = student.save().await;
    assert_matches!(result, Err(AcademyError::Validation(_)));

    let form = student.form().await;
    assert_eq!(form.error("user.email"), Some("Email inválido"));

    let toast = student.view().toasts().pop().unwrap();
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.message, "Erro ao salvar estudante: Email inválido (email)");
    assert!(student.view().statuses().contains(&SaveStatus::Failed));
    assert!(!student.view().navigated());
    assert!(student.is_dirty().await);
}

#[tokio::test]
async fn test_invalid_form_is_never_sent() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/units"))
        .respond_with(ResponseTemplate::new(201).set_body_json(ok_envelope(json!({"id": "x"}))))
        .expect(0)
        .mount(&ctx.backend.server)
        .await;

    let unit = editor::<Unit>(&ctx, None);
    unit.open_create().await;
    unit.set_field("name", "Sem telefone").await.unwrap();
    unit.set_field("zipcode", "0131").await.unwrap();

    let errors = assert_matches!(unit.save().await, Err(AcademyError::Validation(errors)) => errors);
    let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
    assert!(fields.contains(&"phone"));
    assert!(fields.contains(&"zipcode"));

    let toast = unit.view().toasts().pop().unwrap();
    assert_eq!(toast.level, ToastLevel::Warning);
    assert!(toast.message.starts_with("Corrija os campos: "));
    assert!(!unit.view().navigated());
}

#[tokio::test]
async fn test_activity_auto_saves_after_idle() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_get("/api/activities/a1", ok_envelope(activity_json("a1", "Chute frontal", "TECHNIQUE")))
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/activities/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"id": "a1"}))))
        .expect(1)
        .mount(&ctx.backend.server)
        .await;

    let activity = editor::<Activity>(&ctx, None);
    activity.load_entity("a1").await.unwrap();

    activity.set_field("title", "Chute").await.unwrap();
    activity.set_field("title", "Chute frontal alto").await.unwrap();
    assert!(activity.auto_save_pending());
    assert!(activity.is_dirty().await);

    tokio::time::sleep(Duration::from_millis(600)).await;

    assert!(activity.view().statuses().contains(&SaveStatus::AutoSaved));
    assert!(!activity.is_dirty().await);
    let bodies = ctx.backend.bodies("PUT", "/api/activities/a1").await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["title"], "Chute frontal alto");
    assert_eq!(bodies[0]["difficulty"], 2);
    assert_eq!(bodies[0]["equipment"], json!(["luvas"]));
}

#[tokio::test]
async fn test_invalid_edit_is_not_auto_saved() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_get("/api/activities/a1", ok_envelope(activity_json("a1", "Chute frontal", "TECHNIQUE")))
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/activities/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({}))))
        .expect(0)
        .mount(&ctx.backend.server)
        .await;

    let activity = editor::<Activity>(&ctx, None);
    activity.load_entity("a1").await.unwrap();
    activity.set_field("difficulty", "9").await.unwrap();

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(activity.is_dirty().await);
    assert!(!activity.view().statuses().contains(&SaveStatus::AutoSaved));
}

#[tokio::test]
async fn test_missing_entity_returns_to_list() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_status("GET", "/api/units/404", 404, json!({"success": false, "error": "not found"}))
        .await;

    let unit = editor::<Unit>(&ctx, None);
    let result = unit.load_entity("404").await;
    assert_matches!(result, Err(AcademyError::NotFound { .. }));

    let view = unit.view();
    assert!(view.navigated());
    let toast = view.toasts().pop().unwrap();
    assert_eq!(toast.level, ToastLevel::Error);
    assert!(toast.message.starts_with("Erro ao carregar unidade"));
    assert_eq!(
        view.events().iter().filter(|e| matches!(e, EditorEvent::Loading(_))).count(),
        2
    );
}

#[tokio::test]
async fn test_cancel_with_unsaved_changes_needs_force() {
    let ctx = TestContext::new().await;
    let unit = editor::<Unit>(&ctx, None);
    unit.open_create().await;
    assert!(!unit.is_dirty().await);

    unit.set_field("name", "Rascunho").await.unwrap();
    assert!(!unit.cancel(false).await);
    assert!(!unit.view().navigated());

    assert!(unit.cancel(true).await);
    assert!(unit.view().navigated());
}

#[tokio::test]
async fn test_create_draft_is_restored_and_cleared() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_status("POST", "/api/units", 201, ok_envelope(json!({"id": 12})))
        .await;

    let first = editor::<Unit>(&ctx, Some(ctx.preferences().await));
    first.open_create().await;
    first.set_field("name", "Unidade Norte").await.unwrap();
    first.set_field("phone", "1133334444").await.unwrap();

    let second = editor::<Unit>(&ctx, Some(ctx.preferences().await));
    second.open_create().await;
    assert_eq!(second.form().await.get("name"), "Unidade Norte");
    assert!(second.is_dirty().await);
    assert_eq!(second.view().toasts()[0].message, "Rascunho restaurado");

    assert_eq!(
        second.save().await.unwrap(),
        SaveOutcome::Created { id: Some("12".to_string()) }
    );
    let prefs = ctx.preferences().await;
    assert!(prefs.draft("unidades").await.is_none());
}

#[tokio::test]
async fn test_unknown_field_is_rejected() {
    let ctx = TestContext::new().await;
    let unit = editor::<Unit>(&ctx, None);
    unit.open_create().await;

    assert_matches!(
        unit.set_field("favoriteColor", "azul").await,
        Err(AcademyError::InvalidInput(_))
    );
    assert!(!unit.is_dirty().await);
}

#[tokio::test]
async fn test_inline_error_on_bad_value() {
    let ctx = TestContext::new().await;
    let unit = editor::<Unit>(&ctx, None);
    unit.open_create().await;

    unit.set_field("state", "São Paulo").await.unwrap();
    let last_errors = unit
        .view()
        .events()
        .into_iter()
        .rev()
        .find_map(|e| match e {
            EditorEvent::FieldErrors(errors) => Some(errors),
            _ => None,
        })
        .unwrap();
    assert_eq!(last_errors.len(), 1);
    assert_eq!(last_errors[0].field, "state");
    assert!(unit.view().statuses().contains(&SaveStatus::Unsaved));
}

#[tokio::test]
async fn test_switch_mode_without_leaving_screen() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_get("/api/units/u3", ok_envelope(unit_json("u3", "Sul", "Curitiba")))
        .await;

    let unit = editor::<Unit>(&ctx, None);
    unit.open_create().await;
    assert_eq!(unit.mode().await, EditorMode::Create);

    unit.switch_mode(EditorMode::Edit { id: "u3".to_string() }).await.unwrap();
    assert_eq!(unit.mode().await, EditorMode::Edit { id: "u3".to_string() });
    assert_eq!(unit.form().await.get("name"), "Sul");
    assert!(!unit.is_dirty().await);

    unit.switch_mode(EditorMode::Create).await.unwrap();
    assert_eq!(unit.mode().await, EditorMode::Create);
    assert_eq!(unit.form().await.get("name"), "");
    assert!(!unit.view().navigated());
}

#[tokio::test]
async fn test_cleared_fields_are_sent_on_update() {
    let ctx = TestContext::new().await;
    let mut stored = unit_json("u1", "Centro", "Campinas");
    stored["description"] = json!("Antiga descrição");
    stored["capacity"] = json!(80);
    ctx.backend.mock_get("/api/units/u1", ok_envelope(stored)).await;
    ctx.backend
        .mock_status("PUT", "/api/units/u1", 200, ok_envelope(json!({"id": "u1"})))
        .await;

    let unit = editor::<Unit>(&ctx, None);
    unit.load_entity("u1").await.unwrap();
    unit.set_field("description", "").await.unwrap();
    unit.set_field("city", "").await.unwrap();
    unit.set_field("capacity", "").await.unwrap();

    assert_eq!(unit.save().await.unwrap(), SaveOutcome::Updated { id: "u1".to_string() });

    let bodies = ctx.backend.bodies("PUT", "/api/units/u1").await;
    assert_eq!(bodies.len(), 1);
    let body = bodies[0].as_object().unwrap();
    assert_eq!(body["name"], "Centro");
    assert_eq!(body["description"], "");
    assert_eq!(body["city"], "");
    assert!(body.contains_key("capacity"));
    assert!(body["capacity"].is_null());
}

#[tokio::test]
async fn test_manual_save_waits_for_running_auto_save() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_get("/api/activities/a1", ok_envelope(activity_json("a1", "Chute frontal", "TECHNIQUE")))
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/activities/a1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_envelope(json!({"id": "a1"})))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&ctx.backend.server)
        .await;

    let activity = editor::<Activity>(&ctx, None);
    activity.load_entity("a1").await.unwrap();

    activity.set_field("title", "Chute A").await.unwrap();
    // idle timer has fired and the background PUT is in flight
    tokio::time::sleep(Duration::from_millis(200)).await;
    activity.set_field("title", "Chute B").await.unwrap();

    let outcome = activity.save().await.unwrap();
    assert_eq!(outcome, SaveOutcome::Updated { id: "a1".to_string() });
    assert!(!activity.is_dirty().await);
    assert_eq!(
        activity.view().toasts().last().unwrap().message,
        "Atividade atualizada com sucesso"
    );

    // the re-armed auto-save finds nothing left to send
    tokio::time::sleep(Duration::from_millis(300)).await;
    let titles: Vec<_> = ctx
        .backend
        .bodies("PUT", "/api/activities/a1")
        .await
        .into_iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Chute A".to_string(), "Chute B".to_string()]);
}

#[tokio::test]
async fn test_detached_editor_drops_pending_auto_save() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_get("/api/activities/a1", ok_envelope(activity_json("a1", "Chute frontal", "TECHNIQUE")))
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/activities/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({}))))
        .expect(0)
        .mount(&ctx.backend.server)
        .await;

    let activity = editor::<Activity>(&ctx, None);
    activity.load_entity("a1").await.unwrap();
    activity.set_field("title", "Chute alto").await.unwrap();
    assert!(activity.auto_save_pending());

    activity.detach().await;
    assert!(!activity.auto_save_pending());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(ctx.backend.received("PUT", "/api/activities/a1").await, 0);
}
