use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use learn_core::model::{
    CourseId, Enrollment, EnrollmentId, LessonId, LessonProgress, LessonProgressUpdate,
    LessonStatus, Module, ModuleProgress, ProgressSnapshot,
};

use crate::api::{ApiError, EnrollmentApi, ModuleApi};

/// Every mutating call the fake has received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    UpdateProgress {
        enrollment_id: EnrollmentId,
        lesson_id: LessonId,
        update: LessonProgressUpdate,
    },
    CompleteLesson {
        enrollment_id: EnrollmentId,
        lesson_id: LessonId,
    },
}

#[derive(Default)]
struct State {
    enrollments: Vec<Enrollment>,
    modules: HashMap<CourseId, Vec<Module>>,
    progress: HashMap<EnrollmentId, ProgressSnapshot>,
    calls: Vec<RecordedCall>,
    fail_progress_updates: Option<String>,
    fail_next_completion: Option<String>,
    fail_progress_reads: bool,
}

/// Deterministic in-memory backend for tests and the offline demo.
///
/// Completions are reflected in the stored progress snapshot, so a later
/// `get_enrollment_progress` sees them.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, ApiError> {
        self.state
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))
    }

    /// Register a course's module tree.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unavailable` if the internal lock is poisoned.
    pub fn insert_course(&self, course_id: CourseId, modules: Vec<Module>) -> Result<(), ApiError> {
        self.lock()?.modules.insert(course_id, modules);
        Ok(())
    }

    /// Register an enrollment with an initial snapshot derived from the course tree.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unavailable` if the internal lock is poisoned.
    pub fn insert_enrollment(&self, enrollment: Enrollment) -> Result<(), ApiError> {
        let mut state = self.lock()?;
        let snapshot = state
            .modules
            .get(&enrollment.course_id)
            .map(|modules| snapshot_from_modules(modules))
            .unwrap_or_default();
        state.progress.insert(enrollment.id, snapshot);
        state.enrollments.push(enrollment);
        Ok(())
    }

    /// Replace the stored snapshot for an enrollment.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unavailable` if the internal lock is poisoned.
    pub fn set_progress(
        &self,
        enrollment_id: EnrollmentId,
        snapshot: ProgressSnapshot,
    ) -> Result<(), ApiError> {
        self.lock()?.progress.insert(enrollment_id, snapshot);
        Ok(())
    }

    /// Make every progress update fail with the given message until cleared.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unavailable` if the internal lock is poisoned.
    pub fn fail_progress_updates(&self, message: Option<&str>) -> Result<(), ApiError> {
        self.lock()?.fail_progress_updates = message.map(str::to_string);
        Ok(())
    }

    /// Make the next completion call fail with the given backend message.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unavailable` if the internal lock is poisoned.
    pub fn fail_next_completion(&self, message: &str) -> Result<(), ApiError> {
        self.lock()?.fail_next_completion = Some(message.to_string());
        Ok(())
    }

    /// Make progress snapshot reads fail until cleared.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unavailable` if the internal lock is poisoned.
    pub fn fail_progress_reads(&self, fail: bool) -> Result<(), ApiError> {
        self.lock()?.fail_progress_reads = fail;
        Ok(())
    }

    /// Mutating calls received so far.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unavailable` if the internal lock is poisoned.
    pub fn calls(&self) -> Result<Vec<RecordedCall>, ApiError> {
        Ok(self.lock()?.calls.clone())
    }

    /// Progress updates received so far.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unavailable` if the internal lock is poisoned.
    pub fn progress_updates(&self) -> Result<Vec<LessonProgressUpdate>, ApiError> {
        Ok(self
            .lock()?
            .calls
            .iter()
            .filter_map(|call| match call {
                RecordedCall::UpdateProgress { update, .. } => Some(*update),
                RecordedCall::CompleteLesson { .. } => None,
            })
            .collect())
    }
}

fn snapshot_from_modules(modules: &[Module]) -> ProgressSnapshot {
    ProgressSnapshot {
        module_progress: modules
            .iter()
            .map(|module| ModuleProgress {
                module_id: module.id(),
                completed_lessons: module.completed_lessons(),
                lessons: module
                    .lessons()
                    .iter()
                    .map(|lesson| LessonProgress {
                        lesson_id: lesson.id(),
                        status: lesson.status(),
                        progress_percentage: lesson.progress_percentage(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn lesson_entry(
    snapshot: &mut ProgressSnapshot,
    lesson_id: LessonId,
) -> Option<(&mut u32, &mut LessonProgress)> {
    snapshot.module_progress.iter_mut().find_map(|module| {
        let ModuleProgress {
            completed_lessons,
            lessons,
            ..
        } = module;
        lessons
            .iter_mut()
            .find(|lesson| lesson.lesson_id == lesson_id)
            .map(|lesson| (completed_lessons, lesson))
    })
}

fn not_found(what: &str) -> ApiError {
    ApiError::Rejected {
        status: 404,
        message: format!("{what} tidak ditemukan"),
    }
}

#[async_trait]
impl EnrollmentApi for InMemoryBackend {
    async fn get_my_courses(&self) -> Result<Vec<Enrollment>, ApiError> {
        Ok(self.lock()?.enrollments.clone())
    }

    async fn get_enrollment_progress(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<ProgressSnapshot, ApiError> {
        let state = self.lock()?;
        if state.fail_progress_reads {
            return Err(ApiError::Unavailable("progress endpoint offline".into()));
        }
        state
            .progress
            .get(&enrollment_id)
            .cloned()
            .ok_or_else(|| not_found("Enrollment"))
    }

    async fn update_lesson_progress(
        &self,
        enrollment_id: EnrollmentId,
        lesson_id: LessonId,
        update: LessonProgressUpdate,
    ) -> Result<(), ApiError> {
        let mut state = self.lock()?;
        state.calls.push(RecordedCall::UpdateProgress {
            enrollment_id,
            lesson_id,
            update,
        });
        if let Some(message) = state.fail_progress_updates.clone() {
            return Err(ApiError::Rejected {
                status: 500,
                message,
            });
        }
        let snapshot = state
            .progress
            .get_mut(&enrollment_id)
            .ok_or_else(|| not_found("Enrollment"))?;
        if let Some((_, lesson)) = lesson_entry(snapshot, lesson_id) {
            if !lesson.status.is_completed() {
                lesson.status = LessonStatus::InProgress;
                lesson.progress_percentage = update.progress_percentage;
            }
        }
        Ok(())
    }

    async fn complete_lesson(
        &self,
        enrollment_id: EnrollmentId,
        lesson_id: LessonId,
    ) -> Result<(), ApiError> {
        let mut state = self.lock()?;
        state.calls.push(RecordedCall::CompleteLesson {
            enrollment_id,
            lesson_id,
        });
        if let Some(message) = state.fail_next_completion.take() {
            return Err(ApiError::Rejected {
                status: 422,
                message,
            });
        }
        let snapshot = state
            .progress
            .get_mut(&enrollment_id)
            .ok_or_else(|| not_found("Enrollment"))?;
        let (completed_lessons, lesson) =
            lesson_entry(snapshot, lesson_id).ok_or_else(|| not_found("Pelajaran"))?;
        if !lesson.status.is_completed() {
            *completed_lessons += 1;
        }
        lesson.status = LessonStatus::Completed;
        lesson.progress_percentage = 100;
        Ok(())
    }
}

#[async_trait]
impl ModuleApi for InMemoryBackend {
    async fn get_course_modules(&self, course_id: CourseId) -> Result<Vec<Module>, ApiError> {
        self.lock()?
            .modules
            .get(&course_id)
            .cloned()
            .ok_or_else(|| not_found("Kursus"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::model::{Lesson, LessonKind, ModuleId};

    fn seeded() -> InMemoryBackend {
        let backend = InMemoryBackend::new();
        backend
            .insert_course(
                CourseId::new(1),
                vec![Module::new(
                    ModuleId::new(1),
                    "M1",
                    1,
                    vec![
                        Lesson::new(LessonId::new(1), "L1", LessonKind::Video, 1),
                        Lesson::new(LessonId::new(2), "L2", LessonKind::Text, 2),
                    ],
                )],
            )
            .unwrap();
        backend
            .insert_enrollment(Enrollment {
                id: EnrollmentId::new(7),
                course_id: CourseId::new(1),
                course_title: "Rust".into(),
                status: "active".into(),
                progress_percentage: 0,
            })
            .unwrap();
        backend
    }

    #[tokio::test]
    async fn completion_is_reflected_in_snapshot() {
        let backend = seeded();
        backend
            .complete_lesson(EnrollmentId::new(7), LessonId::new(2))
            .await
            .unwrap();
        backend
            .complete_lesson(EnrollmentId::new(7), LessonId::new(2))
            .await
            .unwrap();

        let snapshot = backend
            .get_enrollment_progress(EnrollmentId::new(7))
            .await
            .unwrap();
        let module = &snapshot.module_progress[0];
        assert_eq!(module.completed_lessons, 1);
        assert_eq!(module.lessons[1].status, LessonStatus::Completed);
        assert_eq!(backend.calls().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_completion_carries_message_once() {
        let backend = seeded();
        backend.fail_next_completion("Kuis belum dikerjakan").unwrap();
        let err = backend
            .complete_lesson(EnrollmentId::new(7), LessonId::new(1))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Kuis belum dikerjakan");
        backend
            .complete_lesson(EnrollmentId::new(7), LessonId::new(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn progress_updates_are_recorded_even_when_failing() {
        let backend = seeded();
        backend.fail_progress_updates(Some("boom")).unwrap();
        let update = LessonProgressUpdate {
            progress_percentage: 40,
            last_position: 12.0,
        };
        assert!(
            backend
                .update_lesson_progress(EnrollmentId::new(7), LessonId::new(1), update)
                .await
                .is_err()
        );
        assert_eq!(backend.progress_updates().unwrap(), vec![update]);
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let backend = seeded();
        let err = backend
            .get_course_modules(CourseId::new(99))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
