use axum::Json;
use serde_json::{json, Value};

use crate::infrastructure::http::middleware::ApiError;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Ticketgate - ticket and project progress gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health
pub async fn health() -> &'static str {
    "OK"
}

/// Unknown path, or unsupported method on a known path
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}
