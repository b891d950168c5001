use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::application::services::TicketService;
use crate::infrastructure::http::controllers::{projects, tickets};
use crate::infrastructure::http::dto::*;
use crate::infrastructure::http::middleware::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Value,
    pub id: Value,
}

#[derive(Debug, Deserialize)]
struct TicketIdParams {
    ticket_id: i64,
}

#[derive(Debug, Deserialize)]
struct TagParams {
    tag: String,
}

#[derive(Debug, Deserialize)]
struct UpdateTicketParams {
    ticket_id: i64,
    #[serde(flatten)]
    ticket: TicketRequest,
}

#[derive(Debug, Deserialize)]
struct StatusParams {
    ticket_id: i64,
    status: String,
}

/// POST /rpc
///
/// Operation failures are reported inside `result`; only an unreadable
/// envelope is an HTTP error.
pub async fn handle_rpc(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<RpcResponse>> {
    let request: RpcRequest = parse_json(&body)?;
    tracing::debug!("JSON-RPC call {}", request.method);

    let service = state.ticket_service();
    let result = dispatch(&service, &request.method, request.params)
        .await
        .unwrap_or_else(|e| json!({ "error": e.message() }));

    Ok(Json(RpcResponse {
        jsonrpc: "2.0".to_string(),
        result,
        id: request.id,
    }))
}

async fn dispatch(service: &TicketService, method: &str, params: Value) -> ApiResult<Value> {
    match method {
        "list_tickets" => to_value(tickets::list(service).await),
        "get_ticket" => {
            let p: TicketIdParams = params_of(params)?;
            to_value(tickets::get(service, p.ticket_id).await?)
        }
        "create_ticket" => {
            let request: TicketRequest = params_of(params)?;
            to_value(tickets::create(service, request).await?)
        }
        "update_ticket" => {
            let p: UpdateTicketParams = params_of(params)?;
            to_value(tickets::update(service, p.ticket_id, p.ticket).await?)
        }
        "delete_ticket" => {
            let p: TicketIdParams = params_of(params)?;
            to_value(tickets::delete(service, p.ticket_id).await?)
        }
        "get_project_progress" => {
            let p: TagParams = params_of(params)?;
            to_value(service.get_project_progress(&p.tag).await)
        }
        "search_project_tickets" => {
            let p: TagParams = params_of(params)?;
            let found = service.search_project_tickets(&p.tag).await;
            to_value(found.iter().map(TicketSummary::from).collect::<Vec<_>>())
        }
        "create_project_milestone" => {
            let request: MilestoneRequest = params_of(params)?;
            to_value(projects::create_milestone(service, request).await?)
        }
        "update_ticket_status" => {
            let p: StatusParams = params_of(params)?;
            to_value(tickets::set_status(service, p.ticket_id, &p.status).await?)
        }
        _ => Err(ApiError::MethodNotFound),
    }
}

fn params_of<T: serde::de::DeserializeOwned>(params: Value) -> ApiResult<T> {
    serde_json::from_value(params).map_err(|e| ApiError::BadRequest(format!("Invalid params: {}", e)))
}

fn to_value<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))
}
