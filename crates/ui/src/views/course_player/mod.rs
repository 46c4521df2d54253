mod scripts;
mod view;

pub use view::CoursePlayerView;
#[cfg(test)]
pub(crate) use view::PlayerTestHandles;
