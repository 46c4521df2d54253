use backend::demo::{DEMO_COURSE_ID, demo_backend};
use backend::{InMemoryBackend, RecordedCall};
use learn_core::model::{EnrollmentId, LessonId};
use dioxus::prelude::ReadableExt;

use services::NOT_ENROLLED_MESSAGE;

use super::test_harness::{ViewKind, setup_view_harness};
use crate::routes::MY_COURSES_PATH;
use crate::vm::PlayerIntent;

fn player_view() -> ViewKind {
    ViewKind::Player(DEMO_COURSE_ID.value())
}

#[tokio::test(flavor = "current_thread")]
async fn course_list_smoke_renders_enrolled_course() {
    let mut harness = setup_view_harness(ViewKind::Courses, demo_backend().unwrap());
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Dasar Pemrograman Rust"), "missing title in {html}");
    assert!(html.contains("Aktif · 20% selesai"), "missing status in {html}");
    assert!(html.contains("Lanjutkan"), "missing action in {html}");
    assert!(html.contains("/courses/101/learn"), "missing player link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn course_list_smoke_renders_empty_state() {
    let mut harness = setup_view_harness(ViewKind::Courses, InMemoryBackend::new());
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("Anda belum terdaftar di kursus apa pun."),
        "missing empty state in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn player_smoke_renders_sidebar_and_first_lesson() {
    let mut harness = setup_view_harness(player_view(), demo_backend().unwrap());
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Dasar Pemrograman Rust"), "missing course title in {html}");
    assert!(html.contains("Selamat datang"), "missing first lesson in {html}");
    assert!(html.contains("Menyiapkan toolchain"), "missing second lesson in {html}");
    assert!(html.contains("1/2"), "missing module counter in {html}");
    assert!(html.contains("lesson-video"), "missing video element in {html}");
    assert!(html.contains("Sebelumnya"), "missing previous button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn player_smoke_next_shows_sanitized_reading() {
    let mut harness = setup_view_harness(player_view(), demo_backend().unwrap());
    harness.rebuild();
    harness.settle().await;

    let handles = harness.player_handles();
    let dispatch = handles.dispatch();
    harness.dom.in_runtime(|| dispatch.call(PlayerIntent::Next));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("<h2>Instalasi</h2>"), "missing reading body in {html}");
    assert!(!html.contains("<script"), "script leaked into {html}");
    assert!(!html.contains("lesson-video"), "video still bound in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn player_smoke_mark_complete_records_call_and_advances() {
    let mut harness = setup_view_harness(player_view(), demo_backend().unwrap());
    harness.rebuild();
    harness.settle().await;

    let handles = harness.player_handles();
    let dispatch = handles.dispatch();
    harness.dom.in_runtime(|| dispatch.call(PlayerIntent::Next));
    harness.settle().await;
    harness.dom.in_runtime(|| dispatch.call(PlayerIntent::MarkComplete));
    harness.settle().await;

    assert_eq!(
        harness.backend.calls().unwrap(),
        vec![RecordedCall::CompleteLesson {
            enrollment_id: EnrollmentId::new(9001),
            lesson_id: LessonId::new(2),
        }]
    );
    let current = harness.dom.in_runtime(|| {
        handles
            .vm()
            .read()
            .as_ref()
            .and_then(|vm| vm.current_lesson_id())
    });
    assert_eq!(current, Some(LessonId::new(3)));

    let html = harness.render();
    assert!(html.contains("Move dan borrow"), "next module not expanded in {html}");
    assert!(html.contains("2/2"), "module counter not updated in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn player_smoke_renders_error_with_retry() {
    let backend = demo_backend().unwrap();
    backend.fail_progress_reads(true).unwrap();
    let mut harness = setup_view_harness(player_view(), backend);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("Terjadi kesalahan. Silakan coba lagi."),
        "missing error in {html}"
    );
    assert!(html.contains("Coba lagi"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn player_smoke_not_enrolled_leaves_player() {
    let mut harness = setup_view_harness(ViewKind::Player(202), demo_backend().unwrap());
    harness.rebuild();
    harness.settle().await;
    // The course list loads its own data after the redirect.
    harness.settle().await;

    assert_eq!(harness.current_path(), MY_COURSES_PATH);
    let html = harness.render();
    assert!(!html.contains("player-complete"), "player rendered in {html}");
    assert!(html.contains("Kursus Saya"), "course list not shown in {html}");
    assert!(
        !html.contains(NOT_ENROLLED_MESSAGE),
        "player error left on screen in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn player_smoke_enrolled_course_keeps_its_route() {
    let mut harness = setup_view_harness(player_view(), demo_backend().unwrap());
    harness.rebuild();
    harness.settle().await;

    assert_eq!(harness.current_path(), "/");
    let html = harness.render();
    assert!(html.contains("player-complete"), "player missing in {html}");
    assert!(html.contains("lesson-completed"), "completed marker missing in {html}");
    assert!(html.contains("width: 50%"), "module progress bar missing in {html}");
}
