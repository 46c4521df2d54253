#![forbid(unsafe_code)]

pub mod api;
pub mod demo;
pub mod http;
pub mod memory;

pub use api::{ApiError, Backend, EnrollmentApi, ModuleApi};
pub use http::{HttpBackend, HttpBackendConfig};
pub use memory::{InMemoryBackend, RecordedCall};
