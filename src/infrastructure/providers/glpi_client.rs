use crate::domain::entities::{empty_payload, UpstreamConfig, UpstreamResponse};
use crate::infrastructure::providers::upstream_error::UpstreamError;
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde_json::Value;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

const APP_TOKEN_HEADER: &str = "App-Token";
const SESSION_TOKEN_HEADER: &str = "Session-Token";
const INIT_SESSION_PATH: &str = "/initSession";
const KILL_SESSION_PATH: &str = "/killSession";

/// HTTP client for the upstream (GLPI-style) ticket API.
///
/// Owns one session token. The session is opened lazily by the first call
/// that needs it and is only dropped by `logout`; an expired session is not
/// detected or renewed.
pub struct GlpiClient {
    config: UpstreamConfig,
    http: Client,
    session_token: RwLock<Option<String>>,
}

impl GlpiClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| UpstreamError::ClientBuild(e.to_string()))?;
        Ok(Self::with_http_client(config, http))
    }

    /// Reuse a pooled `reqwest::Client`; the session stays private to this instance
    pub fn with_http_client(config: UpstreamConfig, http: Client) -> Self {
        Self {
            config,
            http,
            session_token: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    pub async fn has_session(&self) -> bool {
        self.session_token.read().await.is_some()
    }

    /// Open a session with the configured tokens. Never fails loudly:
    /// network errors, non-2xx answers and bodies without a token all give `false`.
    pub async fn authenticate(&self) -> bool {
        match self.init_session().await {
            Ok(token) => {
                *self.session_token.write().await = Some(token);
                metrics::counter!("upstream_sessions_total", "outcome" => "opened").increment(1);
                info!("Upstream session opened at {}", self.config.base_url());
                true
            }
            Err(e) => {
                metrics::counter!("upstream_sessions_total", "outcome" => "failed").increment(1);
                warn!("Upstream authentication failed: {}", e);
                false
            }
        }
    }

    async fn init_session(&self) -> Result<String, UpstreamError> {
        let mut request = self
            .http
            .get(self.config.endpoint(INIT_SESSION_PATH))
            .timeout(self.config.timeout())
            .header(CONTENT_TYPE, "application/json")
            .header(APP_TOKEN_HEADER, self.config.app_token());

        if let Some(user_token) = self.config.user_token() {
            request = request.header(AUTHORIZATION, format!("user_token {}", user_token));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Protocol {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body: Value = response.json().await?;
        body.get("session_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or(UpstreamError::MissingSessionToken)
    }

    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> UpstreamResponse {
        self.request_with_query(method, path, &[], body).await
    }

    /// Issue one call, authenticating first if no session exists yet.
    ///
    /// Every outcome is folded into an `UpstreamResponse`; callers only ever
    /// inspect `is_success()` and `error`.
    pub async fn request_with_query(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> UpstreamResponse {
        if !is_supported(&method) {
            let err = UpstreamError::UnsupportedMethod(method.to_string());
            return UpstreamResponse::failure(err.status_code(), err.to_string());
        }

        if !self.has_session().await && !self.authenticate().await {
            return UpstreamResponse::failure(401, "authentication failed");
        }

        let started = Instant::now();
        let response = match self.send(&method, path, query, body).await {
            Ok(response) => response,
            Err(e) => {
                error!("Upstream {} {} failed: {}", method, path, e);
                UpstreamResponse::failure(e.status_code(), e.to_string())
            }
        };

        metrics::counter!(
            "upstream_requests_total",
            "method" => method.to_string(),
            "status" => response.status_code.to_string()
        )
        .increment(1);
        metrics::histogram!("upstream_request_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        debug!(
            "Upstream {} {} returned {}",
            method, path, response.status_code
        );
        response
    }

    async fn send(
        &self,
        method: &Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let session_token = self.session_token.read().await.clone();

        let mut request = self
            .http
            .request(method.clone(), self.config.endpoint(path))
            .timeout(self.config.timeout())
            .header(CONTENT_TYPE, "application/json")
            .header(APP_TOKEN_HEADER, self.config.app_token());

        if let Some(token) = session_token {
            request = request.header(SESSION_TOKEN_HEADER, token);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            let data = decode_body(&bytes)?;
            return Ok(UpstreamResponse::new(status.as_u16(), data));
        }

        // Error bodies are informative only; keep them when they parse
        let data = serde_json::from_slice(&bytes).unwrap_or_else(|_| empty_payload());
        let err = UpstreamError::Protocol {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        };
        Ok(UpstreamResponse {
            status_code: status.as_u16(),
            data,
            error: Some(err.to_string()),
        })
    }

    /// Kill the current session if there is one. Idempotent: with no
    /// session this is a no-op that reports success.
    pub async fn logout(&self) -> bool {
        if !self.has_session().await {
            return true;
        }

        let response = self.request(Method::GET, KILL_SESSION_PATH, None).await;
        self.session_token.write().await.take();

        if response.is_success() {
            metrics::counter!("upstream_sessions_total", "outcome" => "closed").increment(1);
        } else {
            warn!(
                "Failed to close upstream session: {}",
                response.error.as_deref().unwrap_or("unknown error")
            );
        }
        response.is_success()
    }
}

fn is_supported(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::POST | Method::PUT | Method::DELETE
    )
}

fn decode_body(bytes: &[u8]) -> Result<Value, UpstreamError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(empty_payload());
    }
    Ok(serde_json::from_slice(bytes)?)
}
