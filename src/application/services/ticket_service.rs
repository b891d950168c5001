use crate::domain::entities::{ProjectProgress, Ticket, TicketPriority, TicketStatus};
use crate::domain::ports::ticket_repository::TicketRepository;
use chrono::NaiveDateTime;
use std::sync::Arc;

pub const MILESTONE_PREFIX: &str = "📍 MILESTONE: ";

#[derive(Clone)]
pub struct TicketService {
    ticket_repo: Arc<dyn TicketRepository>,
}

impl TicketService {
    pub fn new(ticket_repo: Arc<dyn TicketRepository>) -> Self {
        Self { ticket_repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_tickets(&self) -> Vec<Ticket> {
        self.ticket_repo.list_all().await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_ticket(&self, ticket_id: i64) -> Option<Ticket> {
        self.ticket_repo.get_by_id(ticket_id).await
    }

    /// Invalid tickets are rejected here and never reach the repository
    #[tracing::instrument(skip(self, ticket), fields(name = %ticket.name))]
    pub async fn create_ticket(&self, ticket: Ticket) -> Option<Ticket> {
        if !ticket.is_valid() {
            tracing::debug!("Rejecting invalid ticket");
            return None;
        }
        self.ticket_repo.create(ticket).await
    }

    #[tracing::instrument(skip(self, ticket))]
    pub async fn update_ticket(&self, ticket_id: i64, ticket: Ticket) -> Option<Ticket> {
        if !ticket.is_valid() {
            tracing::debug!("Rejecting invalid ticket");
            return None;
        }
        self.ticket_repo.update(ticket_id, ticket).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_ticket(&self, ticket_id: i64) -> bool {
        self.ticket_repo.delete(ticket_id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn search_project_tickets(&self, project_tag: &str) -> Vec<Ticket> {
        self.ticket_repo.search_by_project_tag(project_tag).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_project_progress(&self, project_tag: &str) -> ProjectProgress {
        let tickets = self.search_project_tickets(project_tag).await;
        ProjectProgress::from_tickets(project_tag, &tickets)
    }

    /// A milestone is an ordinary high-priority ticket with a name prefix
    #[tracing::instrument(skip(self, description))]
    pub async fn create_project_milestone(
        &self,
        name: &str,
        description: &str,
        due_date: Option<NaiveDateTime>,
    ) -> Option<Ticket> {
        let milestone = Ticket::new(format!("{}{}", MILESTONE_PREFIX, name), description)
            .with_priority(TicketPriority::High)
            .with_due_date(due_date);

        self.create_ticket(milestone).await
    }

    /// Fetch, change the status, write back.
    ///
    /// Not atomic: two concurrent updates of the same ticket race and the
    /// last write wins.
    #[tracing::instrument(skip(self))]
    pub async fn update_ticket_status(&self, ticket_id: i64, status: TicketStatus) -> bool {
        let Some(mut ticket) = self.get_ticket(ticket_id).await else {
            return false;
        };
        ticket.status = status;
        self.update_ticket(ticket_id, ticket).await.is_some()
    }
}
