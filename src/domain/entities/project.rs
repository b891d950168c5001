use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ticket::Ticket;

/// A project is never stored upstream; its tickets are found by tag.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub manager_id: Option<i64>,
    pub team_members: Vec<i64>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

impl Project {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.description.is_empty()
    }

    pub fn attach_tickets(mut self, tickets: Vec<Ticket>) -> Self {
        self.tickets = tickets;
        self
    }

    /// Progress over the currently attached tickets
    pub fn progress(&self, project_tag: &str) -> ProjectProgress {
        ProjectProgress::from_tickets(project_tag, &self.tickets)
    }
}

/// Aggregate returned by `/projects/{tag}/progress`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectProgress {
    pub project_tag: String,
    pub total_tickets: usize,
    pub completed_tickets: usize,
    pub in_progress_tickets: usize,
    pub progress_percentage: f64,
    pub remaining_tickets: usize,
}

impl ProjectProgress {
    pub fn from_tickets(project_tag: &str, tickets: &[Ticket]) -> Self {
        let total = tickets.len();
        let completed = tickets.iter().filter(|t| t.status.is_completed()).count();
        let in_progress = tickets.iter().filter(|t| t.status.is_in_progress()).count();

        Self {
            project_tag: project_tag.to_string(),
            total_tickets: total,
            completed_tickets: completed,
            in_progress_tickets: in_progress,
            progress_percentage: percentage(completed, total),
            remaining_tickets: total - completed,
        }
    }
}

/// completed/total*100 rounded to two decimals, ties to even; 0 for an empty set
fn percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = completed as f64 / total as f64 * 100.0;
    (raw * 100.0).round_ties_even() / 100.0
}
