use thiserror::Error;

/// Everything that can go wrong talking to the upstream ticket API.
/// These never leave the client: they are rendered into `UpstreamResponse.error`.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Connection failed: {0} - check that the upstream base URL is correct and reachable")]
    Connect(String),
    #[error("Network error: {0}")]
    Transport(String),
    #[error("HTTP error {status}: {reason}")]
    Protocol { status: u16, reason: String },
    #[error("Invalid upstream response body: {0}")]
    Decode(String),
    #[error("Upstream response has no session token")]
    MissingSessionToken,
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl UpstreamError {
    /// Status reported in the normalized response; 0 when no usable HTTP
    /// response was received
    pub fn status_code(&self) -> u16 {
        match self {
            UpstreamError::Protocol { status, .. } => *status,
            UpstreamError::UnsupportedMethod(_) => 405,
            UpstreamError::MissingSessionToken => 401,
            _ => 0,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout(err.to_string())
        } else if err.is_connect() {
            UpstreamError::Connect(err.to_string())
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::Decode(err.to_string())
    }
}
