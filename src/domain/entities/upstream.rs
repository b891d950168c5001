use serde_json::{Map, Value};
use std::time::Duration;

pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the upstream ticket API. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    base_url: String,
    app_token: String,
    user_token: String,
    timeout: Duration,
}

impl UpstreamConfig {
    pub fn new(
        base_url: impl Into<String>,
        app_token: impl Into<String>,
        user_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            app_token: app_token.into(),
            user_token: user_token.into(),
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn app_token(&self) -> &str {
        &self.app_token
    }

    /// Empty when the upstream is accessed with the app token alone
    pub fn user_token(&self) -> Option<&str> {
        if self.user_token.is_empty() {
            None
        } else {
            Some(&self.user_token)
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Normalized outcome of one upstream call. Status 0 means the call never
/// produced a usable HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status_code: u16,
    pub data: Value,
    pub error: Option<String>,
}

impl UpstreamResponse {
    pub fn new(status_code: u16, data: Value) -> Self {
        Self {
            status_code,
            data,
            error: None,
        }
    }

    pub fn failure(status_code: u16, error: impl Into<String>) -> Self {
        Self {
            status_code,
            data: empty_payload(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

pub fn empty_payload() -> Value {
    Value::Object(Map::new())
}
