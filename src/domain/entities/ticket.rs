use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    New,
    Assigned,
    Planned,
    Waiting,
    Solved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 6] = [
        TicketStatus::New,
        TicketStatus::Assigned,
        TicketStatus::Planned,
        TicketStatus::Waiting,
        TicketStatus::Solved,
        TicketStatus::Closed,
    ];

    /// Numeric code used by the upstream ticket API
    pub fn code(self) -> i64 {
        match self {
            TicketStatus::New => 1,
            TicketStatus::Assigned => 2,
            TicketStatus::Planned => 3,
            TicketStatus::Waiting => 4,
            TicketStatus::Solved => 5,
            TicketStatus::Closed => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::New => "NEW",
            TicketStatus::Assigned => "ASSIGNED",
            TicketStatus::Planned => "PLANNED",
            TicketStatus::Waiting => "WAITING",
            TicketStatus::Solved => "SOLVED",
            TicketStatus::Closed => "CLOSED",
        }
    }

    /// Solved and closed tickets count as done for project progress
    pub fn is_completed(self) -> bool {
        matches!(self, TicketStatus::Solved | TicketStatus::Closed)
    }

    pub fn is_in_progress(self) -> bool {
        matches!(self, TicketStatus::Assigned | TicketStatus::Planned)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i64> for TicketStatus {
    type Error = DomainError;

    fn try_from(code: i64) -> DomainResult<Self> {
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or(DomainError::UnknownStatusCode(code))
    }
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let wanted = s.trim();
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::UnknownStatusName(s.to_string()))
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    VeryLow,
    Low,
    #[default]
    Medium,
    High,
    VeryHigh,
    Major,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 6] = [
        TicketPriority::VeryLow,
        TicketPriority::Low,
        TicketPriority::Medium,
        TicketPriority::High,
        TicketPriority::VeryHigh,
        TicketPriority::Major,
    ];

    /// Numeric code used by the upstream ticket API
    pub fn code(self) -> i64 {
        match self {
            TicketPriority::VeryLow => 1,
            TicketPriority::Low => 2,
            TicketPriority::Medium => 3,
            TicketPriority::High => 4,
            TicketPriority::VeryHigh => 5,
            TicketPriority::Major => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TicketPriority::VeryLow => "VERY_LOW",
            TicketPriority::Low => "LOW",
            TicketPriority::Medium => "MEDIUM",
            TicketPriority::High => "HIGH",
            TicketPriority::VeryHigh => "VERY_HIGH",
            TicketPriority::Major => "MAJOR",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i64> for TicketPriority {
    type Error = DomainError;

    fn try_from(code: i64) -> DomainResult<Self> {
        TicketPriority::ALL
            .into_iter()
            .find(|priority| priority.code() == code)
            .ok_or(DomainError::UnknownPriorityCode(code))
    }
}

impl FromStr for TicketPriority {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let wanted = s.trim();
        TicketPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::UnknownPriorityName(s.to_string()))
    }
}

/// A ticket as seen by the gateway. `id` is only ever assigned by the upstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ticket {
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

impl Ticket {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: TicketPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDateTime>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.content.is_empty()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.is_empty() {
            return Err(DomainError::ValidationError(
                "Ticket name must not be empty".to_string(),
            ));
        }
        if self.content.is_empty() {
            return Err(DomainError::ValidationError(
                "Ticket content must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
