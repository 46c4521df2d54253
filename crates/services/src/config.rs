use std::env;
use std::time::Duration;

use backend::HttpBackendConfig;
use backend::http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use learn_core::ProgressSettings;
use learn_core::model::CourseId;
use learn_core::playback::{DEFAULT_SAVE_INTERVAL, DEFAULT_SAVE_THRESHOLD};

use crate::error::ConfigError;

pub const ENV_API_BASE_URL: &str = "LEARN_API_BASE_URL";
pub const ENV_API_TOKEN: &str = "LEARN_API_TOKEN";
pub const ENV_SAVE_INTERVAL_SECS: &str = "LEARN_SAVE_INTERVAL_SECS";
pub const ENV_SAVE_THRESHOLD: &str = "LEARN_SAVE_THRESHOLD";
pub const ENV_COURSE_ID: &str = "LEARN_COURSE_ID";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "LEARN_REQUEST_TIMEOUT_SECS";

/// Client-side settings for talking to the learning backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub progress: ProgressSettings,
    /// Course to open on launch instead of the course list.
    pub course_id: Option<CourseId>,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            progress: ProgressSettings::default(),
            course_id: None,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Read settings from the process environment, loading `.env` first.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when a variable is set but unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            // A missing .env file is fine.
            let _ = dotenvy::dotenv();
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when a variable is set but unparsable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let interval_secs = parse::<u64>(ENV_SAVE_INTERVAL_SECS, get(ENV_SAVE_INTERVAL_SECS))?;
        let threshold = parse::<f64>(ENV_SAVE_THRESHOLD, get(ENV_SAVE_THRESHOLD))?;
        let timeout_secs = parse::<u64>(ENV_REQUEST_TIMEOUT_SECS, get(ENV_REQUEST_TIMEOUT_SECS))?;
        let course_id = parse::<CourseId>(ENV_COURSE_ID, get(ENV_COURSE_ID))?;

        let interval = interval_secs
            .map(|secs| check_interval(ENV_SAVE_INTERVAL_SECS, secs))
            .transpose()?;
        let threshold = threshold
            .map(|value| check_threshold(ENV_SAVE_THRESHOLD, value))
            .transpose()?;

        Ok(Self {
            api_base_url: get(ENV_API_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_token: get(ENV_API_TOKEN),
            progress: ProgressSettings::new(
                interval.unwrap_or(DEFAULT_SAVE_INTERVAL),
                threshold.unwrap_or(DEFAULT_SAVE_THRESHOLD),
            ),
            course_id,
            request_timeout: timeout_secs.map_or(DEFAULT_TIMEOUT, Duration::from_secs),
        })
    }

    /// Replace the save period, checked the same way as `LEARN_SAVE_INTERVAL_SECS`.
    ///
    /// `source` names the setting in the error, e.g. a command-line flag.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `secs` is zero.
    pub fn with_save_interval_secs(
        mut self,
        source: &'static str,
        secs: u64,
    ) -> Result<Self, ConfigError> {
        let interval = check_interval(source, secs)?;
        self.progress = ProgressSettings::new(interval, self.progress.save_threshold());
        Ok(self)
    }

    /// Replace the save threshold, checked the same way as `LEARN_SAVE_THRESHOLD`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `value` is negative or not finite.
    pub fn with_save_threshold(
        mut self,
        source: &'static str,
        value: f64,
    ) -> Result<Self, ConfigError> {
        let threshold = check_threshold(source, value)?;
        self.progress = ProgressSettings::new(self.progress.save_interval(), threshold);
        Ok(self)
    }

    #[must_use]
    pub fn http_config(&self) -> HttpBackendConfig {
        HttpBackendConfig {
            base_url: self.api_base_url.clone(),
            token: self.api_token.clone(),
            timeout: self.request_timeout,
        }
    }
}

fn check_interval(var: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            var,
            reason: "must be at least 1".into(),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn check_threshold(var: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidValue {
            var,
            reason: "must be a non-negative number".into(),
        });
    }
    Ok(value)
}

fn parse<T>(var: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.parse::<T>().map_err(|e| ConfigError::InvalidValue {
                var,
                reason: e.to_string(),
            })
        })
        .transpose()
}
