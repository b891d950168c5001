pub mod cors;
pub mod error;

pub use cors::cors_middleware;
pub use error::{ApiError, ApiResult};

use crate::application::services::TicketService;
use crate::domain::ports::ticket_repository::TicketRepositoryFactory;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repositories: Arc<dyn TicketRepositoryFactory>,
}

impl AppState {
    pub fn new(repositories: Arc<dyn TicketRepositoryFactory>) -> Self {
        Self { repositories }
    }

    /// Fresh service (and upstream session) for the current request
    pub fn ticket_service(&self) -> TicketService {
        TicketService::new(self.repositories.repository())
    }
}
