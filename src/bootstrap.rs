use crate::config::Config;
use crate::domain::ports::ticket_repository::TicketRepositoryFactory;
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::persistence::GlpiRepositoryFactory;
use std::sync::Arc;

pub fn build_app_state(config: &Config) -> Result<AppState, Box<dyn std::error::Error>> {
    let upstream = config.upstream();
    tracing::info!(
        "Upstream ticket API at {} (timeout {:?}, user token {})",
        upstream.base_url(),
        upstream.timeout(),
        if upstream.user_token().is_some() { "set" } else { "not set" }
    );

    if upstream.app_token().is_empty() {
        tracing::warn!("GLPI_APP_TOKEN is empty; upstream authentication will likely fail");
    }

    let repositories =
        Arc::new(GlpiRepositoryFactory::new(upstream)?) as Arc<dyn TicketRepositoryFactory>;

    Ok(AppState::new(repositories))
}
