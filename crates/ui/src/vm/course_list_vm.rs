use learn_core::model::{CourseId, Enrollment};

/// One card in the learner's course list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseCardVm {
    pub course_id: CourseId,
    pub title: String,
    pub status_label: String,
    pub progress: u32,
    pub action_label: &'static str,
}

#[must_use]
pub fn map_course_cards(enrollments: &[Enrollment]) -> Vec<CourseCardVm> {
    enrollments
        .iter()
        .map(|enrollment| CourseCardVm {
            course_id: enrollment.course_id,
            title: course_title(enrollment),
            status_label: status_label(&enrollment.status),
            progress: enrollment.progress_percentage.min(100),
            action_label: action_label(enrollment),
        })
        .collect()
}

fn course_title(enrollment: &Enrollment) -> String {
    if enrollment.course_title.trim().is_empty() {
        format!("Kursus #{}", enrollment.course_id)
    } else {
        enrollment.course_title.clone()
    }
}

fn status_label(status: &str) -> String {
    match status.to_ascii_lowercase().as_str() {
        "active" => "Aktif".to_string(),
        "completed" => "Selesai".to_string(),
        "pending" => "Menunggu".to_string(),
        "" => "-".to_string(),
        _ => status.to_string(),
    }
}

fn action_label(enrollment: &Enrollment) -> &'static str {
    if enrollment.is_completed() {
        "Ulangi"
    } else if enrollment.progress_percentage > 0 {
        "Lanjutkan"
    } else {
        "Mulai"
    }
}
