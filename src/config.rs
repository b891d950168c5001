use crate::domain::entities::UpstreamConfig;
use std::env;
use std::time::Duration;

pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost/glpi/apirest.php";

#[derive(Clone, Debug)]
pub struct Config {
    pub upstream_base_url: String,
    pub upstream_app_token: String,
    pub upstream_user_token: String,
    pub upstream_timeout_secs: u64,
    pub server_host: String,
    pub server_port: u16,
    pub otel_exporter_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let upstream_base_url =
            lookup("GLPI_BASE_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());

        let upstream_app_token = lookup("GLPI_APP_TOKEN").unwrap_or_default();

        let upstream_user_token = lookup("GLPI_USER_TOKEN").unwrap_or_default();

        let upstream_timeout_secs: u64 = match lookup("GLPI_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
            None => 30,
        };

        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        // PORT is what most hosting platforms inject
        let server_port = lookup("PORT")
            .or_else(|| lookup("SERVER_PORT"))
            .unwrap_or_else(|| "8000".to_string())
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let otel_exporter_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT");

        let service_name = lookup("SERVICE_NAME").unwrap_or_else(|| "ticketgate".to_string());

        let metrics_port: Option<u16> = lookup("METRICS_PORT")
            .map(|raw| raw.trim().parse().map_err(|_| ConfigError::InvalidMetricsPort))
            .transpose()?;

        Ok(Config {
            upstream_base_url,
            upstream_app_token,
            upstream_user_token,
            upstream_timeout_secs,
            server_host,
            server_port,
            otel_exporter_endpoint,
            service_name,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn upstream(&self) -> UpstreamConfig {
        UpstreamConfig::new(
            self.upstream_base_url.clone(),
            self.upstream_app_token.clone(),
            self.upstream_user_token.clone(),
        )
        .with_timeout(Duration::from_secs(self.upstream_timeout_secs))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid metrics port number")]
    InvalidMetricsPort,

    #[error("GLPI_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}
