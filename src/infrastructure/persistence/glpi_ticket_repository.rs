use crate::domain::entities::{Ticket, UpstreamConfig};
use crate::domain::ports::ticket_repository::{TicketRepository, TicketRepositoryFactory};
use crate::infrastructure::persistence::field_map::{self, decode_ticket, encode_ticket, TicketField};
use crate::infrastructure::providers::glpi_client::GlpiClient;
use crate::infrastructure::providers::upstream_error::UpstreamError;
use reqwest::{Client, Method};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Only the first page is ever fetched
pub const LIST_RANGE: &str = "0-49";
const SEARCH_PATH: &str = "/search/Ticket";
const TICKET_PATH: &str = "/Ticket";

/// Ticket repository backed by the upstream ticket API
pub struct GlpiTicketRepository {
    client: GlpiClient,
}

impl GlpiTicketRepository {
    pub fn new(client: GlpiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GlpiClient {
        &self.client
    }

    async fn search(&self, query: &[(&str, String)]) -> Vec<Ticket> {
        let response = self
            .client
            .request_with_query(Method::GET, SEARCH_PATH, query, None)
            .await;

        if !response.is_success() {
            warn!(
                "Ticket search failed: {}",
                response.error.as_deref().unwrap_or("unknown error")
            );
            return Vec::new();
        }

        decode_rows(&response.data)
    }
}

/// Decode the `data` array of a search answer, dropping rows that fail
pub fn decode_rows(payload: &Value) -> Vec<Ticket> {
    let Some(rows) = payload.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| match decode_ticket(row) {
            Ok(ticket) => Some(ticket),
            Err(e) => {
                warn!("Skipping undecodable ticket row: {}", e);
                None
            }
        })
        .collect()
}

fn is_empty_payload(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

pub fn project_tag_query(tag: &str) -> Vec<(&'static str, String)> {
    vec![
        ("criteria[0][field]", field_map::search_id(TicketField::Name).to_string()),
        ("criteria[0][searchtype]", "contains".to_string()),
        ("criteria[0][value]", format!("%{}%", tag)),
        ("range", LIST_RANGE.to_string()),
    ]
}

#[async_trait::async_trait]
impl TicketRepository for GlpiTicketRepository {
    async fn list_all(&self) -> Vec<Ticket> {
        self.search(&[("range", LIST_RANGE.to_string())]).await
    }

    async fn get_by_id(&self, id: i64) -> Option<Ticket> {
        let response = self
            .client
            .request(Method::GET, &format!("{}/{}", TICKET_PATH, id), None)
            .await;

        if !response.is_success() {
            debug!("Ticket {} not fetched: {:?}", id, response.error);
            return None;
        }

        if is_empty_payload(&response.data) {
            debug!("Ticket {} fetched with an empty body", id);
            return None;
        }

        match decode_ticket(&response.data) {
            Ok(mut ticket) => {
                ticket.id.get_or_insert(id);
                Some(ticket)
            }
            Err(e) => {
                warn!("Ticket {} could not be decoded: {}", id, e);
                None
            }
        }
    }

    async fn create(&self, mut ticket: Ticket) -> Option<Ticket> {
        if !ticket.is_valid() {
            return None;
        }

        let payload = encode_ticket(&ticket, None);
        let response = self
            .client
            .request(Method::POST, TICKET_PATH, Some(&payload))
            .await;

        if !response.is_success() {
            warn!(
                "Ticket creation failed: {}",
                response.error.as_deref().unwrap_or("unknown error")
            );
            return None;
        }

        match response.data.get(field_map::ID_KEY).and_then(field_map::as_id) {
            Some(id) => {
                ticket.id = Some(id);
                Some(ticket)
            }
            None => {
                warn!("Ticket creation answered without an id: {}", response.data);
                None
            }
        }
    }

    async fn update(&self, id: i64, mut ticket: Ticket) -> Option<Ticket> {
        if !ticket.is_valid() {
            return None;
        }

        let payload = encode_ticket(&ticket, Some(id));
        let response = self
            .client
            .request(Method::PUT, &format!("{}/{}", TICKET_PATH, id), Some(&payload))
            .await;

        if !response.is_success() {
            warn!(
                "Ticket {} update failed: {}",
                id,
                response.error.as_deref().unwrap_or("unknown error")
            );
            return None;
        }

        ticket.id = Some(id);
        Some(ticket)
    }

    async fn delete(&self, id: i64) -> bool {
        self.client
            .request(Method::DELETE, &format!("{}/{}", TICKET_PATH, id), None)
            .await
            .is_success()
    }

    async fn search_by_project_tag(&self, tag: &str) -> Vec<Ticket> {
        self.search(&project_tag_query(tag)).await
    }
}

/// Builds one repository, and so one upstream session, per request.
/// The connection pool is shared; sessions never are.
pub struct GlpiRepositoryFactory {
    config: UpstreamConfig,
    http: Client,
}

impl GlpiRepositoryFactory {
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| UpstreamError::ClientBuild(e.to_string()))?;
        Ok(Self { config, http })
    }
}

impl TicketRepositoryFactory for GlpiRepositoryFactory {
    fn repository(&self) -> Arc<dyn TicketRepository> {
        let client = GlpiClient::with_http_client(self.config.clone(), self.http.clone());
        Arc::new(GlpiTicketRepository::new(client))
    }
}
