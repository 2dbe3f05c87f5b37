use std::sync::Arc;

use tokio::sync::mpsc;

use genscan_core::backend::mock::{MockBackend, MockHealth, MockReply};
use genscan_core::{
    BackendHealth, Category, DetectionMode, NotificationKind, Session, SessionConfig,
};

use super::*;
use crate::action::Action;
use crate::tui_event::{BackendCommand, BackendEvent};

/// Create an App around a mock backend. Must run inside a tokio runtime.
fn test_app(backend: Arc<MockBackend>) -> App {
    let session = Session::start(backend, &SessionConfig::default());
    App::new(session, "hacker")
}

/// Attach a command channel so submissions can be observed.
fn with_commands(app: &mut App) -> mpsc::UnboundedReceiver<BackendCommand> {
    let (tx, rx) = mpsc::unbounded_channel();
    app.backend_cmd_tx = Some(tx);
    rx
}

/// Run the next queued submission against `backend` and feed the result back.
async fn complete_next(
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<BackendCommand>,
    backend: &MockBackend,
) {
    let BackendCommand::Submit(prepared) = rx.try_recv().expect("a submission was queued");
    let outcome = prepared.dispatch(backend).await;
    app.handle_backend_event(BackendEvent::SubmissionFinished(outcome));
}

fn toast_message(app: &App) -> Option<&str> {
    app.visible_toast().map(|n| n.message.as_str())
}

// ── Startup ────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn starts_on_main_screen_in_image_mode() {
    let app = test_app(Arc::new(MockBackend::new()));
    assert_eq!(app.screen, Screen::Main);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.session.mode(), DetectionMode::ImageDetection);
    assert!(app.session.result_view().is_none());
}

// ── Submission ─────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn submit_without_image_shows_validation_message() {
    let backend = Arc::new(MockBackend::new());
    let mut app = test_app(backend.clone());
    let mut rx = with_commands(&mut app);
    app.session.wait_for_probe().await.unwrap();

    app.update(Action::Submit);

    assert_eq!(toast_message(&app), Some("Please select an image to upload."));
    assert!(rx.try_recv().is_err());
    assert_eq!(backend.detection_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn text_submission_round_trip() {
    let backend = Arc::new(
        MockBackend::new()
            .with_health(MockHealth::status("idle", "idle"))
            .with_reply(MockReply::verdict("Likely AI-generated", 0.87)),
    );
    let mut app = test_app(backend.clone());
    let mut rx = with_commands(&mut app);
    app.session.wait_for_probe().await.unwrap();

    app.update(Action::SelectMode(DetectionMode::TextDetection));
    app.set_text("hello world");
    app.update(Action::DrillIn);
    assert!(app.session.is_submitting());

    complete_next(&mut app, &mut rx, &backend).await;

    assert_eq!(toast_message(&app), Some("Text analysis done!"));
    let view = app.session.result_view().unwrap();
    assert_eq!(view.category, Category::Alert);
    assert_eq!(view.percent_label(), "87.00%");
    assert_eq!(backend.last_text().as_deref(), Some("hello world"));
}

#[tokio::test(start_paused = true)]
async fn submit_is_ignored_while_model_loads() {
    let backend = Arc::new(MockBackend::new().with_health(MockHealth::status("idle", "loading")));
    let mut app = test_app(backend);
    let mut rx = with_commands(&mut app);
    assert_eq!(
        app.session.wait_for_probe().await.unwrap(),
        BackendHealth::ModelLoading
    );

    app.set_text("some text");
    app.update(Action::SelectMode(DetectionMode::TextDetection));
    app.update(Action::Submit);

    assert!(rx.try_recv().is_err());
    assert!(app.visible_toast().is_none());
}

#[tokio::test(start_paused = true)]
async fn service_error_is_shown_verbatim() {
    let backend = Arc::new(MockBackend::new().with_reply(MockReply::Service {
        status: 400,
        message: "No image uploaded".into(),
    }));
    let mut app = test_app(backend.clone());
    let mut rx = with_commands(&mut app);
    app.session
        .capture_image(Some(genscan_core::ImageFile::from_bytes("a.png", vec![1u8])));

    app.update(Action::Submit);
    complete_next(&mut app, &mut rx, &backend).await;

    let toast = app.visible_toast().unwrap();
    assert_eq!(toast.kind, NotificationKind::Error);
    assert_eq!(toast.message, "No image uploaded");
}

// ── Mode switching ─────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn switching_mode_clears_result() {
    let backend = Arc::new(MockBackend::new().with_reply(MockReply::verdict("Human-written", 0.9)));
    let mut app = test_app(backend.clone());
    let mut rx = with_commands(&mut app);

    app.update(Action::SelectMode(DetectionMode::TextDetection));
    app.set_text("prose");
    app.update(Action::Submit);
    complete_next(&mut app, &mut rx, &backend).await;
    assert!(app.session.result_view().is_some());

    app.update(Action::SwitchMode);
    assert_eq!(app.session.mode(), DetectionMode::ImageDetection);
    assert!(app.session.result_view().is_none());
}

#[tokio::test(start_paused = true)]
async fn outcome_arriving_after_mode_switch_is_dropped() {
    let backend = Arc::new(MockBackend::new().with_reply(MockReply::verdict("AI-generated", 0.9)));
    let mut app = test_app(backend.clone());
    let mut rx = with_commands(&mut app);

    app.update(Action::SelectMode(DetectionMode::TextDetection));
    app.set_text("prose");
    app.update(Action::Submit);
    app.update(Action::SelectMode(DetectionMode::ImageDetection));
    complete_next(&mut app, &mut rx, &backend).await;

    assert!(app.session.result_view().is_none());
    assert!(app.visible_toast().is_none());
}

#[tokio::test(start_paused = true)]
async fn start_editing_keeps_result_in_text_mode() {
    let backend = Arc::new(MockBackend::new().with_reply(MockReply::verdict("Human-written", 0.9)));
    let mut app = test_app(backend.clone());
    let mut rx = with_commands(&mut app);

    app.update(Action::StartEditing);
    app.update(Action::TextInput('h'));
    app.update(Action::TextInput('i'));
    app.update(Action::Submit);
    complete_next(&mut app, &mut rx, &backend).await;
    assert_eq!(app.input_mode, InputMode::Normal);

    app.update(Action::StartEditing);
    assert!(app.session.result_view().is_some());
}

// ── Text editing ───────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn editor_inserts_at_cursor() {
    let mut app = test_app(Arc::new(MockBackend::new()));
    app.update(Action::StartEditing);
    assert_eq!(app.session.mode(), DetectionMode::TextDetection);
    assert_eq!(app.input_mode, InputMode::Editing);

    for c in "helo".chars() {
        app.update(Action::TextInput(c));
    }
    app.update(Action::CursorLeft);
    app.update(Action::TextInput('l'));
    assert_eq!(app.session.panel().text(), "hello");

    app.update(Action::CursorEnd);
    app.update(Action::Paste(" wörld".into()));
    app.update(Action::Backspace);
    assert_eq!(app.session.panel().text(), "hello wörl");

    app.update(Action::CursorHome);
    app.update(Action::DeleteForward);
    assert_eq!(app.session.panel().text(), "ello wörl");

    // 'q' is text while editing, not quit
    app.update(Action::TextInput('q'));
    assert!(!app.confirm_quit);

    app.update(Action::StopEditing);
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[tokio::test(start_paused = true)]
async fn backspace_handles_multibyte_chars() {
    let mut app = test_app(Arc::new(MockBackend::new()));
    app.update(Action::StartEditing);
    app.update(Action::Paste("日本".into()));
    app.update(Action::Backspace);
    assert_eq!(app.session.panel().text(), "日");
    app.update(Action::CursorLeft);
    assert_eq!(app.text_cursor, 0);
}

// ── File picker ────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn picker_selects_image_and_returns() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("photo.png"), b"\x89PNG").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"hi").unwrap();

    let mut app = test_app(Arc::new(MockBackend::new()));
    app.update(Action::OpenFilePicker);
    assert_eq!(app.screen, Screen::FilePicker);
    app.file_picker = FilePickerState::at(dir.path().to_path_buf());

    let notes = app
        .file_picker
        .entries
        .iter()
        .position(|e| e.name == "notes.txt")
        .unwrap();
    app.file_picker.cursor = notes;
    app.update(Action::DrillIn);
    // Non-images are not selectable
    assert_eq!(app.screen, Screen::FilePicker);

    let photo = app
        .file_picker
        .entries
        .iter()
        .position(|e| e.name == "photo.png")
        .unwrap();
    app.file_picker.cursor = photo;
    app.update(Action::DrillIn);

    assert_eq!(app.screen, Screen::Main);
    assert_eq!(
        app.session.panel().image().map(|i| i.name()),
        Some("photo.png")
    );
    assert_eq!(toast_message(&app), Some("Selected photo.png"));
}

#[tokio::test(start_paused = true)]
async fn picker_escape_returns_without_selection() {
    let mut app = test_app(Arc::new(MockBackend::new()));
    app.update(Action::OpenFilePicker);
    app.update(Action::NavigateBack);
    assert_eq!(app.screen, Screen::Main);
    assert!(app.session.panel().image().is_none());
}

#[tokio::test(start_paused = true)]
async fn clear_image_removes_selection() {
    let mut app = test_app(Arc::new(MockBackend::new()));
    app.session
        .capture_image(Some(genscan_core::ImageFile::from_bytes("a.png", vec![1u8])));
    app.update(Action::ClearImage);
    assert!(app.session.panel().image().is_none());
    assert_eq!(toast_message(&app), Some("Image removed."));
}

// ── Overlays ───────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn quit_requires_confirmation() {
    let mut app = test_app(Arc::new(MockBackend::new()));
    assert!(!app.update(Action::Quit));
    assert!(app.confirm_quit);

    app.update(Action::NavigateBack);
    assert!(!app.confirm_quit);

    app.update(Action::Quit);
    assert!(app.update(Action::Quit));
    assert!(app.should_quit);
}

#[tokio::test(start_paused = true)]
async fn help_closes_on_any_key() {
    let mut app = test_app(Arc::new(MockBackend::new()));
    app.update(Action::ToggleHelp);
    assert!(app.show_help);
    app.update(Action::Tick);
    assert!(app.show_help);
    app.update(Action::MoveDown);
    assert!(!app.show_help);
}

#[tokio::test(start_paused = true)]
async fn toast_expires_after_timeout() {
    let mut app = test_app(Arc::new(MockBackend::new()));
    app.notify(genscan_core::Notification::info("hello"));
    for _ in 0..NOTIFICATION_TICKS - 1 {
        app.update(Action::Tick);
    }
    assert_eq!(toast_message(&app), Some("hello"));
    app.update(Action::Tick);
    assert!(app.visible_toast().is_none());
}

#[tokio::test(start_paused = true)]
async fn theme_cycles_through_names() {
    let mut app = test_app(Arc::new(MockBackend::new()));
    assert_eq!(app.theme_name, "hacker");
    app.update(Action::CycleTheme);
    assert_eq!(app.theme_name, "modern");
    app.update(Action::CycleTheme);
    assert_eq!(app.theme_name, "hacker");
}
