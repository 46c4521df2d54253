use serde::{Deserialize, Serialize};

use crate::model::ids::{CourseId, EnrollmentId};

/// A learner's registration record for a course.
///
/// Created and owned by the backend; this client only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    #[serde(rename = "enrollable_id")]
    pub course_id: CourseId,
    #[serde(default)]
    pub course_title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub progress_percentage: u32,
}

impl Enrollment {
    /// Linear scan for the enrollment that belongs to `course_id`.
    #[must_use]
    pub fn find_for_course(enrollments: &[Self], course_id: CourseId) -> Option<&Self> {
        enrollments.iter().find(|e| e.course_id == course_id)
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("completed") || self.progress_percentage >= 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(id: u64, course: u64) -> Enrollment {
        Enrollment {
            id: EnrollmentId::new(id),
            course_id: CourseId::new(course),
            course_title: format!("Course {course}"),
            status: "active".into(),
            progress_percentage: 0,
        }
    }

    #[test]
    fn finds_matching_course() {
        let list = vec![enrollment(1, 10), enrollment(2, 20), enrollment(3, 30)];
        let found = Enrollment::find_for_course(&list, CourseId::new(20)).unwrap();
        assert_eq!(found.id, EnrollmentId::new(2));
    }

    #[test]
    fn returns_none_without_match() {
        let list = vec![enrollment(1, 10), enrollment(2, 20), enrollment(3, 30)];
        assert!(Enrollment::find_for_course(&list, CourseId::new(99)).is_none());
    }

    #[test]
    fn decodes_backend_field_names() {
        let json = r#"{"id": 5, "enrollable_id": 12, "course_title": "Rust", "status": "active", "progress_percentage": 40}"#;
        let parsed: Enrollment = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.course_id, CourseId::new(12));
        assert_eq!(parsed.progress_percentage, 40);
        assert!(!parsed.is_completed());
    }
}
