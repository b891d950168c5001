use crate::infrastructure::http::controllers::{health, projects, rpc, tickets};
use crate::infrastructure::http::middleware::{cors_middleware, AppState};
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root).fallback(health::not_found))
        .route("/health", get(health::health).fallback(health::not_found))
        .route(
            "/tickets",
            get(tickets::list_tickets)
                .post(tickets::create_ticket)
                .fallback(health::not_found),
        )
        .route(
            "/tickets/:id",
            get(tickets::get_ticket)
                .put(tickets::update_ticket)
                .delete(tickets::delete_ticket)
                .fallback(health::not_found),
        )
        .route(
            "/tickets/:id/status",
            patch(tickets::update_ticket_status).fallback(health::not_found),
        )
        .route(
            "/projects/:tag/progress",
            get(projects::get_project_progress).fallback(health::not_found),
        )
        .route(
            "/projects/:tag/tickets",
            get(projects::list_project_tickets).fallback(health::not_found),
        )
        .route(
            "/milestones",
            post(projects::create_project_milestone).fallback(health::not_found),
        )
        // JSON-RPC variant of the same operations
        .route("/rpc", post(rpc::handle_rpc).fallback(health::not_found))
        .fallback(health::not_found)
        .layer(axum::middleware::from_fn(cors_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
