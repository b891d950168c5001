pub mod field_map;
pub mod glpi_ticket_repository;

pub use glpi_ticket_repository::{GlpiRepositoryFactory, GlpiTicketRepository};
