use dioxus::prelude::*;
use services::{NOT_ENROLLED_MESSAGE, ProgressReaderError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    NotEnrolled,
    Backend(String),
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::NotEnrolled => NOT_ENROLLED_MESSAGE,
            Self::Backend(message) => message,
            Self::Unknown => "Terjadi kesalahan. Silakan coba lagi.",
        }
    }
}

impl From<ProgressReaderError> for ViewError {
    fn from(err: ProgressReaderError) -> Self {
        match err {
            ProgressReaderError::NotEnrolled { .. } => Self::NotEnrolled,
            ProgressReaderError::Api(api) => Self::Backend(api.user_message()),
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
