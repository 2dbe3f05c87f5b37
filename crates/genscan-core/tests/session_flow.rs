//! End-to-end session behaviour against the scripted [`MockBackend`].
//!
//! Time is paused in every test so health polling and reply latency are
//! deterministic.

use std::sync::Arc;
use std::time::Duration;

use genscan_core::backend::mock::{MockBackend, MockHealth, MockReply};
use genscan_core::{
    Applied, BackendHealth, Category, DetectError, DetectionMode, ImageFile, Notification,
    NotificationKind, ResultSlot, Session, SessionConfig,
};

fn config() -> SessionConfig {
    SessionConfig {
        poll_interval: Duration::from_secs(5),
        ..SessionConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn image_submit_without_file_never_calls_backend() {
    let backend = Arc::new(MockBackend::new());
    let mut session = Session::start(backend.clone(), &config());
    session.wait_for_probe().await.unwrap();

    let note = session.submit_image().await;
    assert_eq!(note, Notification::error("Please select an image to upload."));
    assert_eq!(backend.detection_calls(), 0);
    assert_eq!(
        session.last_error().map(|e| e.message.as_str()),
        Some("Please select an image to upload.")
    );

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn blank_text_never_calls_backend() {
    let backend = Arc::new(MockBackend::new());
    let mut session = Session::start(backend.clone(), &config());

    for text in ["", " ", "\n\n\t"] {
        session.capture_text(text);
        let note = session.submit_text().await;
        assert_eq!(note, Notification::error("Please enter some text for analysis."));
    }
    assert_eq!(backend.detection_calls(), 0);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn ready_backend_scores_text() {
    let backend = Arc::new(
        MockBackend::new()
            .with_health(MockHealth::status("idle", "idle"))
            .with_reply(MockReply::verdict("Likely AI-generated", 0.87)),
    );
    let mut session = Session::start(backend.clone(), &config());
    assert_eq!(session.wait_for_probe().await.unwrap(), BackendHealth::Ready);
    assert!(session.can_submit());

    session.capture_text("hello world");
    let note = session.submit_text().await;
    assert_eq!(note, Notification::success("Text analysis done!"));
    assert_eq!(backend.text_calls(), 1);
    assert_eq!(backend.last_text().as_deref(), Some("hello world"));

    let view = session.result_view().unwrap();
    assert_eq!(view.verdict, "Likely AI-generated");
    assert_eq!(view.category, Category::Alert);
    assert_eq!(view.percent_label(), "87.00%");
    assert!(!view.stale);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn image_is_sent_with_its_name() {
    let backend = Arc::new(MockBackend::new().with_reply(MockReply::verdict("Real image", 0.912)));
    let mut session = Session::start(backend.clone(), &config());

    session.capture_image(Some(ImageFile::from_bytes("cat.png", b"\x89PNG".to_vec())));
    let note = session.submit_image().await;
    assert_eq!(note, Notification::success("Image scan done!"));
    assert_eq!(backend.image_calls(), 1);
    assert_eq!(backend.last_image().as_deref(), Some("cat.png"));

    let view = session.result_view().unwrap();
    assert_eq!(view.category, Category::Success);
    assert_eq!(view.percent_label(), "91.20%");

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn loading_model_blocks_both_triggers() {
    let backend = Arc::new(MockBackend::new().with_health(MockHealth::status("loading", "idle")));
    let mut session = Session::start(backend.clone(), &config());
    assert_eq!(
        session.wait_for_probe().await.unwrap(),
        BackendHealth::ModelLoading
    );
    assert!(!session.can_submit());
    assert_eq!(
        session.health().advisory(),
        "Model is loading... Please wait..."
    );

    session.capture_image(Some(ImageFile::from_bytes("a.jpg", vec![0u8; 4])));
    session.capture_text("text");
    assert_eq!(session.submit_image().await.kind, NotificationKind::Error);
    assert_eq!(session.submit_text().await.kind, NotificationKind::Error);
    assert_eq!(backend.detection_calls(), 0);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn unreachable_backend_recovers_on_next_tick() {
    let backend = Arc::new(MockBackend::new().with_health_sequence(vec![
        MockHealth::Down,
        MockHealth::status("running", "running"),
    ]));
    let mut session = Session::start(backend.clone(), &config());
    assert_eq!(
        session.wait_for_probe().await.unwrap(),
        BackendHealth::Unreachable
    );
    assert!(!session.can_submit());

    let mut rx = session.health_receiver();
    rx.wait_for(|h| *h == BackendHealth::Ready).await.unwrap();
    assert!(session.can_submit());
    assert_eq!(backend.health_calls(), 2);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn mode_switch_clears_result() {
    let backend = Arc::new(MockBackend::new().with_reply(MockReply::verdict("Human-written", 0.7)));
    let mut session = Session::start(backend, &config());

    session.capture_text("a paragraph");
    session.submit_text().await;
    assert!(session.result_view().is_some());

    session.set_mode(DetectionMode::ImageDetection);
    assert!(session.result_view().is_none());
    assert_eq!(session.result_slot(), &ResultSlot::Empty);
    // Pending text survives the switch.
    assert_eq!(session.panel().text(), "a paragraph");

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn submitting_in_other_mode_clears_previous_result() {
    let backend = Arc::new(
        MockBackend::new().with_reply(MockReply::verdict("Likely AI-generated", 0.87)),
    );
    let mut session = Session::start(backend.clone(), &config());
    session.wait_for_probe().await.unwrap();

    session.capture_text("hello world");
    session.submit_text().await;
    assert_eq!(session.result_view().unwrap().category, Category::Alert);

    let note = session.submit_image().await;
    assert_eq!(note, Notification::error("Please select an image to upload."));
    assert_eq!(session.mode(), DetectionMode::ImageDetection);
    assert!(session.result_view().is_none());
    assert_eq!(backend.detection_calls(), 1);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn switching_to_text_drops_pending_image() {
    let backend = Arc::new(MockBackend::new());
    let mut session = Session::start(backend.clone(), &config());
    session.wait_for_probe().await.unwrap();

    session.capture_image(Some(ImageFile::from_bytes("cat.png", vec![1u8])));
    session.set_mode(DetectionMode::TextDetection);
    session.set_mode(DetectionMode::ImageDetection);
    assert!(session.panel().image().is_none());

    let note = session.submit_image().await;
    assert_eq!(note.kind, NotificationKind::Error);
    assert_eq!(backend.detection_calls(), 0);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn failure_after_success_keeps_stale_result() {
    let backend = Arc::new(MockBackend::new().with_reply_sequence(vec![
        MockReply::verdict("AI-generated", 0.66),
        MockReply::Transport("connection reset".into()),
    ]));
    let mut session = Session::start(backend, &config());

    session.capture_text("first");
    session.submit_text().await;
    let note = session.submit_text().await;
    assert_eq!(note, Notification::error("Failed to analyze text. Please try again."));

    let view = session.result_view().unwrap();
    assert!(view.stale);
    assert_eq!(view.verdict, "AI-generated");
    assert_eq!(view.percent_label(), "66.00%");

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn service_error_message_is_surfaced_verbatim() {
    let backend = Arc::new(MockBackend::new().with_reply(MockReply::Service {
        status: 503,
        message: "CLIP model is still loading. Please try again later.".into(),
    }));
    let mut session = Session::start(backend, &config());

    session.capture_image(Some(ImageFile::from_bytes("x.png", vec![1u8])));
    let note = session.submit_image().await;
    assert_eq!(
        note,
        Notification::error("CLIP model is still loading. Please try again later.")
    );
    assert!(session.result_view().is_none());

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn latest_issued_submission_wins_over_late_arrival() {
    // First request is slow, second is fast.
    let backend = Arc::new(
        MockBackend::new()
            .with_reply_sequence(vec![
                MockReply::verdict("AI-generated", 0.99),
                MockReply::verdict("Human-written", 0.51),
            ])
            .with_reply_delays(vec![Duration::from_secs(3), Duration::from_millis(100)]),
    );
    let mut session = Session::start(backend.clone(), &config());
    session.capture_text("draft one");
    let first = session.begin_submit().unwrap();
    session.capture_text("draft two");
    let second = session.begin_submit().unwrap();
    assert!(session.is_submitting());

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    for prepared in [first, second] {
        let backend = session.backend();
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = prepared.dispatch(backend.as_ref()).await;
            let _ = tx.send(outcome);
        });
    }
    drop(tx);

    let mut applied = Vec::new();
    while let Some(outcome) = rx.recv().await {
        applied.push(session.apply(outcome));
    }

    assert!(matches!(applied[0], Applied::Succeeded(_)));
    assert_eq!(applied[1], Applied::Superseded);
    assert_eq!(session.result_view().unwrap().verdict, "Human-written");
    assert!(!session.is_submitting());

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn mode_switch_drops_in_flight_response() {
    let backend = Arc::new(
        MockBackend::new()
            .with_reply(MockReply::verdict("AI-generated", 0.9))
            .with_reply_delays(vec![Duration::from_secs(2)]),
    );
    let mut session = Session::start(backend.clone(), &config());
    session.capture_text("pending");
    session.set_mode(DetectionMode::TextDetection);
    let prepared = session.begin_submit().unwrap();

    let dispatch = {
        let backend = session.backend();
        tokio::spawn(async move { prepared.dispatch(backend.as_ref()).await })
    };
    session.set_mode(DetectionMode::ImageDetection);

    let outcome = dispatch.await.unwrap();
    assert!(outcome.result.is_ok());
    assert_eq!(session.apply(outcome), Applied::Superseded);
    assert!(session.result_view().is_none());

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_probing() {
    let backend = Arc::new(MockBackend::new());
    let mut session = Session::start(backend.clone(), &config());

    tokio::time::sleep(Duration::from_secs(11)).await;
    let before = backend.health_calls();
    assert_eq!(before, 3);

    session.shutdown().await;
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(backend.health_calls(), before);
}

#[tokio::test(start_paused = true)]
async fn validation_error_type_is_exposed() {
    let backend = Arc::new(MockBackend::new());
    let mut session = Session::start(backend, &config());
    let err = session
        .begin_submit()
        .map(|_| ())
        .unwrap_err();
    assert_eq!(err.message, "Please select an image to upload.");
    assert_eq!(
        DetectError::from(genscan_core::ValidationError::NoImageSelected).to_string(),
        "validation error: no image selected"
    );
    session.shutdown().await;
}
