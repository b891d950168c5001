use crate::domain::entities::Ticket;
use std::sync::Arc;

/// Ticket storage as seen by the use-case layer.
///
/// Implementations swallow transport and decode failures: a failed read
/// yields `None` or an empty list, a failed write yields `None` or `false`.
#[async_trait::async_trait]
pub trait TicketRepository: Send + Sync {
    /// First page of tickets; rows that cannot be decoded are skipped
    async fn list_all(&self) -> Vec<Ticket>;

    async fn get_by_id(&self, id: i64) -> Option<Ticket>;

    /// Returns the ticket with its upstream-assigned id
    async fn create(&self, ticket: Ticket) -> Option<Ticket>;

    async fn update(&self, id: i64, ticket: Ticket) -> Option<Ticket>;

    async fn delete(&self, id: i64) -> bool;

    /// Tickets whose name contains `tag`
    async fn search_by_project_tag(&self, tag: &str) -> Vec<Ticket>;
}

/// Hands out a repository for the lifetime of one inbound request
pub trait TicketRepositoryFactory: Send + Sync {
    fn repository(&self) -> Arc<dyn TicketRepository>;
}
