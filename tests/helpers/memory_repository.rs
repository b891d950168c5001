use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use ticketgate::domain::entities::{Ticket, TicketStatus};
use ticketgate::domain::ports::ticket_repository::{TicketRepository, TicketRepositoryFactory};
use ticketgate::infrastructure::http::build_router;
use ticketgate::infrastructure::http::middleware::AppState;

/// Ticket store kept in memory; ids are handed out from 100 upwards
#[derive(Default)]
pub struct MemoryTicketRepository {
    tickets: Mutex<BTreeMap<i64, Ticket>>,
    fail_writes: bool,
}

impl MemoryTicketRepository {
    pub fn new(seed: Vec<Ticket>) -> Self {
        let tickets = seed
            .into_iter()
            .filter_map(|ticket| ticket.id.map(|id| (id, ticket)))
            .collect();
        Self {
            tickets: Mutex::new(tickets),
            fail_writes: false,
        }
    }

    /// Every create/update/delete reports failure, like an upstream outage
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn snapshot(&self, id: i64) -> Option<Ticket> {
        self.tickets.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl TicketRepository for MemoryTicketRepository {
    async fn list_all(&self) -> Vec<Ticket> {
        self.tickets.lock().unwrap().values().cloned().collect()
    }

    async fn get_by_id(&self, id: i64) -> Option<Ticket> {
        self.tickets.lock().unwrap().get(&id).cloned()
    }

    async fn create(&self, mut ticket: Ticket) -> Option<Ticket> {
        if self.fail_writes {
            return None;
        }
        let mut tickets = self.tickets.lock().unwrap();
        let id = tickets.keys().next_back().map_or(100, |last| (*last).max(99) + 1);
        ticket.id = Some(id);
        tickets.insert(id, ticket.clone());
        Some(ticket)
    }

    async fn update(&self, id: i64, mut ticket: Ticket) -> Option<Ticket> {
        if self.fail_writes {
            return None;
        }
        ticket.id = Some(id);
        self.tickets.lock().unwrap().insert(id, ticket.clone());
        Some(ticket)
    }

    async fn delete(&self, id: i64) -> bool {
        !self.fail_writes && self.tickets.lock().unwrap().remove(&id).is_some()
    }

    async fn search_by_project_tag(&self, tag: &str) -> Vec<Ticket> {
        self.tickets
            .lock()
            .unwrap()
            .values()
            .filter(|ticket| ticket.name.contains(tag))
            .cloned()
            .collect()
    }
}

/// Hands the same repository to every request
pub struct SharedRepositoryFactory(pub Arc<MemoryTicketRepository>);

impl TicketRepositoryFactory for SharedRepositoryFactory {
    fn repository(&self) -> Arc<dyn TicketRepository> {
        self.0.clone()
    }
}

pub fn ticket(id: i64, name: &str, status: TicketStatus) -> Ticket {
    let mut ticket = Ticket::new(name, format!("{} details", name)).with_status(status);
    ticket.id = Some(id);
    ticket
}

/// Three PROJECT-ALPHA tickets (one solved, one assigned) and one unrelated
pub fn seeded_repository() -> Arc<MemoryTicketRepository> {
    Arc::new(MemoryTicketRepository::new(vec![
        ticket(1, "PROJECT-ALPHA kickoff", TicketStatus::Solved),
        ticket(2, "PROJECT-ALPHA schema", TicketStatus::Assigned),
        ticket(3, "PROJECT-ALPHA rollout", TicketStatus::New),
        ticket(4, "Printer on floor 2", TicketStatus::Closed),
    ]))
}

pub fn router_for(repo: Arc<MemoryTicketRepository>) -> axum::Router {
    build_router(AppState::new(Arc::new(SharedRepositoryFactory(repo))))
}
