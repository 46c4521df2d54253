mod course_list_vm;
mod course_player_vm;
mod lesson_vm;
mod time_fmt;

pub use course_list_vm::{CourseCardVm, map_course_cards};
pub use course_player_vm::{
    CoursePlayerVm, LessonRowVm, ModuleRowVm, PlayerEffect, PlayerHeaderVm, PlayerIntent,
    ReportingTarget,
};
pub use lesson_vm::{LessonBodyVm, LessonPaneVm, kind_label, map_lesson_pane, sanitize_html};
pub use time_fmt::format_saved_at;
