use std::sync::Arc;

use backend::{EnrollmentApi, ModuleApi};
use learn_core::model::{Course, CourseId, Enrollment, EnrollmentId, ProgressSnapshot};
use tracing::{debug, info};

use crate::error::ProgressReaderError;

/// A learner's enrollment together with the merged module/lesson tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseProgress {
    pub enrollment: Enrollment,
    pub course: Course,
}

/// Resolves the learner's enrollment for a course and loads its progress.
#[derive(Clone)]
pub struct EnrollmentProgressReader {
    enrollments: Arc<dyn EnrollmentApi>,
    modules: Arc<dyn ModuleApi>,
}

impl EnrollmentProgressReader {
    #[must_use]
    pub fn new(enrollments: Arc<dyn EnrollmentApi>, modules: Arc<dyn ModuleApi>) -> Self {
        Self {
            enrollments,
            modules,
        }
    }

    /// All enrollments of the signed-in learner.
    ///
    /// # Errors
    ///
    /// Returns `ProgressReaderError::Api` if the enrollment list cannot be fetched.
    pub async fn my_courses(&self) -> Result<Vec<Enrollment>, ProgressReaderError> {
        Ok(self.enrollments.get_my_courses().await?)
    }

    /// Find the enrollment for `course_id`, then fetch the module tree and merge
    /// the progress snapshot into it.
    ///
    /// # Errors
    ///
    /// Returns `ProgressReaderError::NotEnrolled` when no enrollment references the
    /// course, or `ProgressReaderError::Api` if any backend call fails.
    pub async fn load(&self, course_id: CourseId) -> Result<CourseProgress, ProgressReaderError> {
        let enrollments = self.enrollments.get_my_courses().await?;
        let enrollment = Enrollment::find_for_course(&enrollments, course_id)
            .cloned()
            .ok_or(ProgressReaderError::NotEnrolled { course_id })?;
        debug!(%course_id, enrollment_id = %enrollment.id, "resolved enrollment");

        let modules = self.modules.get_course_modules(course_id).await?;
        let mut course = Course::new(
            course_id,
            enrollment.course_title.clone(),
            slugify(&enrollment.course_title),
            modules,
        );
        self.refresh(enrollment.id, &mut course).await?;

        info!(
            %course_id,
            enrollment_id = %enrollment.id,
            modules = course.modules().len(),
            lessons = course.lesson_count(),
            "course progress loaded"
        );
        Ok(CourseProgress { enrollment, course })
    }

    /// Re-fetch the progress snapshot and merge it into `course`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressReaderError::Api` if the snapshot cannot be fetched.
    pub async fn refresh(
        &self,
        enrollment_id: EnrollmentId,
        course: &mut Course,
    ) -> Result<(), ProgressReaderError> {
        let snapshot = self.snapshot(enrollment_id).await?;
        course.merge_progress(&snapshot);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ProgressReaderError::Api` if the snapshot cannot be fetched.
    pub async fn snapshot(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<ProgressSnapshot, ProgressReaderError> {
        Ok(self
            .enrollments
            .get_enrollment_progress(enrollment_id)
            .await?)
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
