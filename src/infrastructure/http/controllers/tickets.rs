use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application::services::TicketService;
use crate::domain::entities::TicketStatus;
use crate::infrastructure::http::dto::*;
use crate::infrastructure::http::middleware::{ApiError, ApiResult, AppState};

pub(crate) async fn list(service: &TicketService) -> Vec<TicketSummary> {
    service
        .list_tickets()
        .await
        .iter()
        .map(TicketSummary::from)
        .collect()
}

pub(crate) async fn get(service: &TicketService, ticket_id: i64) -> ApiResult<TicketDetail> {
    service
        .get_ticket(ticket_id)
        .await
        .map(TicketDetail::from)
        .ok_or_else(|| ApiError::NotFound(format!("Ticket {} not found", ticket_id)))
}

pub(crate) async fn create(service: &TicketService, request: TicketRequest) -> ApiResult<TicketSummary> {
    let ticket = request.into_ticket()?;
    service
        .create_ticket(ticket)
        .await
        .filter(|created| created.id.is_some())
        .map(|created| TicketSummary::from(&created))
        .ok_or_else(|| ApiError::Internal("Failed to create ticket".to_string()))
}

pub(crate) async fn update(
    service: &TicketService,
    ticket_id: i64,
    request: TicketRequest,
) -> ApiResult<TicketSummary> {
    let ticket = request.into_ticket()?;
    service
        .update_ticket(ticket_id, ticket)
        .await
        .map(|updated| TicketSummary::from(&updated))
        .ok_or_else(|| ApiError::Internal(format!("Failed to update ticket {}", ticket_id)))
}

pub(crate) async fn delete(service: &TicketService, ticket_id: i64) -> ApiResult<MessageResponse> {
    if service.delete_ticket(ticket_id).await {
        Ok(MessageResponse::new(format!("Ticket {} deleted", ticket_id)))
    } else {
        Err(ApiError::Internal(format!("Failed to delete ticket {}", ticket_id)))
    }
}

pub(crate) async fn set_status(
    service: &TicketService,
    ticket_id: i64,
    status: &str,
) -> ApiResult<StatusResponse> {
    let status: TicketStatus = status.parse()?;
    if service.update_ticket_status(ticket_id, status).await {
        Ok(StatusResponse {
            id: ticket_id,
            status,
        })
    } else {
        Err(ApiError::Internal(format!(
            "Failed to update status of ticket {}",
            ticket_id
        )))
    }
}

/// GET /tickets
pub async fn list_tickets(State(state): State<AppState>) -> Json<Vec<TicketSummary>> {
    Json(list(&state.ticket_service()).await)
}

/// GET /tickets/:id
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TicketDetail>> {
    let ticket_id = parse_ticket_id(&id)?;
    Ok(Json(get(&state.ticket_service(), ticket_id).await?))
}

/// POST /tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<TicketSummary>)> {
    let request: TicketRequest = parse_json(&body)?;
    let created = create(&state.ticket_service(), request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /tickets/:id
pub async fn update_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<TicketSummary>> {
    let ticket_id = parse_ticket_id(&id)?;
    let request: TicketRequest = parse_json(&body)?;
    Ok(Json(update(&state.ticket_service(), ticket_id, request).await?))
}

/// DELETE /tickets/:id
pub async fn delete_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let ticket_id = parse_ticket_id(&id)?;
    Ok(Json(delete(&state.ticket_service(), ticket_id).await?))
}

/// PATCH /tickets/:id/status
pub async fn update_ticket_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<StatusResponse>> {
    let ticket_id = parse_ticket_id(&id)?;
    let request: StatusRequest = parse_json(&body)?;
    Ok(Json(
        set_status(&state.ticket_service(), ticket_id, &request.status).await?,
    ))
}
