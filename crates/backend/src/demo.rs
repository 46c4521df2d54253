//! Seed data for running the client without a live backend.

use learn_core::model::{
    CourseId, Enrollment, EnrollmentId, Lesson, LessonId, LessonKind, LessonStatus, Module,
    ModuleId,
};

use crate::api::ApiError;
use crate::memory::InMemoryBackend;

pub const DEMO_COURSE_ID: CourseId = CourseId::new(101);

const SAMPLE_VIDEO: &str =
    "https://interactive-examples.mdn.mozilla.net/media/cc0-videos/flower.mp4";

fn demo_modules() -> Vec<Module> {
    vec![
        Module::new(
            ModuleId::new(1),
            "Pengenalan",
            1,
            vec![
                Lesson::new(LessonId::new(1), "Selamat datang", LessonKind::Video, 1)
                    .with_content_url(SAMPLE_VIDEO)
                    .with_duration_minutes(3)
                    .with_preview(true)
                    .with_progress(LessonStatus::Completed, 100),
                Lesson::new(LessonId::new(2), "Menyiapkan toolchain", LessonKind::Text, 2)
                    .with_content(
                        "<h2>Instalasi</h2><p>Jalankan <code>rustup</code> lalu \
                         <strong>cargo new</strong>.</p><script>alert(1)</script>",
                    )
                    .with_duration_minutes(5),
            ],
        ),
        Module::new(
            ModuleId::new(2),
            "Ownership",
            2,
            vec![
                Lesson::new(LessonId::new(3), "Move dan borrow", LessonKind::Video, 1)
                    .with_content_url(SAMPLE_VIDEO)
                    .with_duration_minutes(12)
                    .with_progress(LessonStatus::InProgress, 35),
                Lesson::new(LessonId::new(4), "Kuis ownership", LessonKind::Quiz, 2)
                    .with_description("Sepuluh soal pilihan ganda tentang ownership."),
                Lesson::new(LessonId::new(5), "Tugas: parser CSV", LessonKind::Assignment, 3)
                    .with_description("Tulis parser CSV sederhana tanpa alokasi berlebih."),
            ],
        ),
        Module::new(ModuleId::new(3), "Bonus (segera hadir)", 3, Vec::new()),
    ]
}

/// An in-memory backend holding one enrolled course and one course the learner
/// is not enrolled in.
///
/// # Errors
///
/// Returns `ApiError::Unavailable` if seeding the fake fails.
pub fn demo_backend() -> Result<InMemoryBackend, ApiError> {
    let backend = InMemoryBackend::new();
    backend.insert_course(DEMO_COURSE_ID, demo_modules())?;
    backend.insert_course(CourseId::new(202), Vec::new())?;
    backend.insert_enrollment(Enrollment {
        id: EnrollmentId::new(9001),
        course_id: DEMO_COURSE_ID,
        course_title: "Dasar Pemrograman Rust".into(),
        status: "active".into(),
        progress_percentage: 20,
    })?;
    Ok(backend)
}
