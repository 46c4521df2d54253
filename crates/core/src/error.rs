use thiserror::Error;

use crate::model::{LessonKindError, ParseIdError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    LessonKind(#[from] LessonKindError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
}
