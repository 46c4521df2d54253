mod course_player;
mod courses;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use course_player::CoursePlayerView;
pub use courses::CourseListView;
pub use state::{ViewError, ViewState, view_state_from_resource};
