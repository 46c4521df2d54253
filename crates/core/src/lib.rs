#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod navigation;
pub mod playback;
pub mod time;

pub use error::Error;
pub use navigation::{Navigator, Position};
pub use playback::{PlaybackSample, ProgressSettings};
pub use time::Clock;
