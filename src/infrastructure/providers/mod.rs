pub mod glpi_client;
pub mod upstream_error;

pub use glpi_client::GlpiClient;
pub use upstream_error::UpstreamError;
