//! JSON-over-HTTP adapter for the learning backend.

mod mapping;

use std::time::Duration;

use async_trait::async_trait;
use learn_core::model::{
    CourseId, Enrollment, EnrollmentId, LessonId, LessonProgressUpdate, Module, ProgressSnapshot,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{ApiError, EnrollmentApi, ModuleApi};
use mapping::{Envelope, ModuleDto, error_message, map_module};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Debug)]
pub struct HttpBackendConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns `ApiError::Decode` if the base URL is not an absolute http(s) URL,
    /// or `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: HttpBackendConfig) -> Result<Self, ApiError> {
        let parsed = reqwest::Url::parse(config.base_url.trim())
            .map_err(|e| ApiError::Decode(format!("invalid base url: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Decode(format!(
                "unsupported base url scheme: {}",
                parsed.scheme()
            )));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            token: config.token.filter(|token| !token.trim().is_empty()),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "backend request");
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = check(self.request(Method::GET, path).send().await?).await?;
        let body: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.into_inner())
    }

    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        check(self.request(Method::POST, path).json(body).send().await?).await?;
        Ok(())
    }

    async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        check(self.request(Method::POST, path).send().await?).await?;
        Ok(())
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(status.as_u16(), &body);
    debug!(status = status.as_u16(), %message, "backend rejected request");
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl EnrollmentApi for HttpBackend {
    async fn get_my_courses(&self) -> Result<Vec<Enrollment>, ApiError> {
        self.get_json("enrollments/my-courses").await
    }

    async fn get_enrollment_progress(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<ProgressSnapshot, ApiError> {
        self.get_json(&format!("enrollments/{enrollment_id}/progress"))
            .await
    }

    async fn update_lesson_progress(
        &self,
        enrollment_id: EnrollmentId,
        lesson_id: LessonId,
        update: LessonProgressUpdate,
    ) -> Result<(), ApiError> {
        self.post_json(
            &format!("enrollments/{enrollment_id}/lessons/{lesson_id}/progress"),
            &update,
        )
        .await
    }

    async fn complete_lesson(
        &self,
        enrollment_id: EnrollmentId,
        lesson_id: LessonId,
    ) -> Result<(), ApiError> {
        self.post_empty(&format!(
            "enrollments/{enrollment_id}/lessons/{lesson_id}/complete"
        ))
        .await
    }
}

#[async_trait]
impl ModuleApi for HttpBackend {
    async fn get_course_modules(&self, course_id: CourseId) -> Result<Vec<Module>, ApiError> {
        let modules: Vec<ModuleDto> = self.get_json(&format!("courses/{course_id}/modules")).await?;
        modules.into_iter().map(map_module).collect()
    }
}
