use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application::services::TicketService;
use crate::domain::entities::ProjectProgress;
use crate::infrastructure::http::dto::*;
use crate::infrastructure::http::middleware::{ApiError, ApiResult, AppState};

pub(crate) async fn create_milestone(
    service: &TicketService,
    request: MilestoneRequest,
) -> ApiResult<TicketSummary> {
    let due_date = request.due_date.as_deref().map(parse_date).transpose()?;
    if request.name.is_empty() || request.description.is_empty() {
        return Err(ApiError::BadRequest(
            "Milestone name and description are required".to_string(),
        ));
    }

    service
        .create_project_milestone(&request.name, &request.description, due_date)
        .await
        .map(|created| TicketSummary::from(&created))
        .ok_or_else(|| ApiError::Internal("Failed to create milestone".to_string()))
}

/// GET /projects/:tag/progress
pub async fn get_project_progress(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Json<ProjectProgress> {
    Json(state.ticket_service().get_project_progress(&tag).await)
}

/// GET /projects/:tag/tickets
pub async fn list_project_tickets(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Json<Vec<TicketSummary>> {
    let tickets = state.ticket_service().search_project_tickets(&tag).await;
    Json(tickets.iter().map(TicketSummary::from).collect())
}

/// POST /milestones
pub async fn create_project_milestone(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<TicketSummary>)> {
    let request: MilestoneRequest = parse_json(&body)?;
    let created = create_milestone(&state.ticket_service(), request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
