use crate::domain::entities::{Ticket, TicketPriority, TicketStatus};
use crate::infrastructure::http::middleware::{ApiError, ApiResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Row of `GET /tickets`, also returned by create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSummary {
    pub id: Option<i64>,
    pub name: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
}

impl From<&Ticket> for TicketSummary {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            name: ticket.name.clone(),
            status: ticket.status,
            priority: ticket.priority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketDetail {
    pub id: Option<i64>,
    pub name: String,
    pub content: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub category_id: Option<i64>,
    pub assigned_user_id: Option<i64>,
    pub assigned_group_id: Option<i64>,
    pub due_date: Option<NaiveDateTime>,
    pub created_date: Option<NaiveDateTime>,
}

impl From<Ticket> for TicketDetail {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            name: ticket.name,
            content: ticket.content,
            status: ticket.status,
            priority: ticket.priority,
            category_id: ticket.category_id,
            assigned_user_id: ticket.assigned_user_id,
            assigned_group_id: ticket.assigned_group_id,
            due_date: ticket.due_date,
            created_date: ticket.created_date,
        }
    }
}

/// Body of `POST /tickets` and `PUT /tickets/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketRequest {
    #[serde(default, alias = "title")]
    pub name: String,
    #[serde(default)]
    pub content: String,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category_id: Option<i64>,
    pub assigned_user_id: Option<i64>,
    pub assigned_group_id: Option<i64>,
    pub due_date: Option<String>,
}

impl TicketRequest {
    /// Build a ticket, rejecting unknown status/priority names and empty
    /// name or content
    pub fn into_ticket(self) -> ApiResult<Ticket> {
        let status = match self.status.as_deref().filter(|s| !s.is_empty()) {
            Some(name) => name.parse::<TicketStatus>()?,
            None => TicketStatus::default(),
        };
        let priority = match self.priority.as_deref().filter(|s| !s.is_empty()) {
            Some(name) => name.parse::<TicketPriority>()?,
            None => TicketPriority::default(),
        };
        let due_date = self.due_date.as_deref().map(parse_date).transpose()?;

        let ticket = Ticket {
            id: None,
            name: self.name,
            content: self.content,
            status,
            priority,
            category_id: self.category_id,
            assigned_user_id: self.assigned_user_id,
            assigned_group_id: self.assigned_group_id,
            due_date,
            created_date: None,
        };
        ticket
            .validate()
            .map_err(|e| ApiError::BadRequest(format!("Invalid ticket data: {}", e)))?;
        Ok(ticket)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub id: i64,
    pub status: TicketStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MilestoneRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    Ok(serde_json::from_slice(body)?)
}

/// Ticket ids are plain positive integers; signs and zero are rejected
pub fn parse_ticket_id(raw: &str) -> ApiResult<i64> {
    let digits = raw.trim();
    digits
        .bytes()
        .all(|b| b.is_ascii_digit())
        .then(|| digits.parse::<i64>().ok())
        .flatten()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid ticket id: {}", raw)))
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD HH:MM:SS`
pub fn parse_date(raw: &str) -> ApiResult<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid date: {}", raw)))
}
