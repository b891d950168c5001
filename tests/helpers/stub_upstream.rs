use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use ticketgate::domain::entities::UpstreamConfig;

pub const STUB_APP_TOKEN: &str = "app-token";
pub const STUB_USER_TOKEN: &str = "user-token";
pub const STUB_SESSION: &str = "session-1";
pub const STUB_CREATED_ID: i64 = 42;

/// What the stub upstream saw, plus the canned answers it gives
#[derive(Default)]
pub struct StubState {
    pub sessions_opened: usize,
    pub sessions_killed: usize,
    pub withhold_session_token: bool,
    pub authorization_headers: Vec<String>,
    pub session_headers: Vec<String>,
    pub search_queries: Vec<BTreeMap<String, String>>,
    pub search_rows: Vec<Value>,
    /// A `Value::Null` item is answered 200 with an empty body
    pub items: HashMap<i64, Value>,
    /// Overrides the `id` returned by ticket creation
    pub created_id: Option<Value>,
    pub created: Vec<Value>,
    pub updated: Vec<(i64, Value)>,
    pub deleted: Vec<i64>,
}

type Shared = Arc<Mutex<StubState>>;

/// In-process stand-in for the upstream ticket API, bound to an ephemeral port
pub struct StubUpstream {
    pub base_url: String,
    pub state: Shared,
}

impl StubUpstream {
    pub async fn start() -> Self {
        Self::start_with(StubState::default()).await
    }

    pub async fn start_with(initial: StubState) -> Self {
        let state = Arc::new(Mutex::new(initial));
        let app = Router::new()
            .route("/initSession", get(init_session))
            .route("/killSession", get(kill_session))
            .route("/search/Ticket", get(search_tickets))
            .route("/maintenance", get(maintenance_page))
            .route("/Ticket", axum::routing::post(create_ticket))
            .route(
                "/Ticket/:id",
                get(get_ticket).put(update_ticket).delete(delete_ticket),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub upstream");
        let addr = listener.local_addr().expect("Stub upstream has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn config(&self) -> UpstreamConfig {
        UpstreamConfig::new(self.base_url.clone(), STUB_APP_TOKEN, STUB_USER_TOKEN)
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut StubState) -> R) -> R {
        let mut state = self.state.lock().expect("Stub state poisoned");
        f(&mut state)
    }
}

/// Upstream row in search shape: search option ids as keys
pub fn search_row(id: i64, name: &str, status: i64) -> Value {
    json!({ "id": id, "1": name, "2": format!("{} details", name), "12": status, "3": 3 })
}

/// Upstream item in direct-fetch shape: named keys
pub fn item(id: i64, name: &str, status: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "content": format!("{} details", name),
        "status": status,
        "priority": 4,
        "time_to_resolve": "2026-11-30 17:00:00",
        "date": "2026-10-01 09:30:00",
    })
}

fn has_session(state: &StubState, headers: &HeaderMap) -> bool {
    state.sessions_opened > 0
        && headers
            .get("Session-Token")
            .and_then(|v| v.to_str().ok())
            .map(|token| token == STUB_SESSION)
            .unwrap_or(false)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!(["ERROR_SESSION_TOKEN_INVALID", "session_token seems invalid"])),
    )
}

async fn init_session(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("Stub state poisoned");

    if let Some(auth) = headers.get("Authorization").and_then(|v| v.to_str().ok()) {
        state.authorization_headers.push(auth.to_string());
    }

    let app_token = headers.get("App-Token").and_then(|v| v.to_str().ok());
    if app_token != Some(STUB_APP_TOKEN) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!(["ERROR_WRONG_APP_TOKEN_PARAMETER", "missing app token"])),
        );
    }

    if state.withhold_session_token {
        return (StatusCode::OK, Json(json!({})));
    }

    state.sessions_opened += 1;
    (StatusCode::OK, Json(json!({ "session_token": STUB_SESSION })))
}

async fn kill_session(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("Stub state poisoned");
    if !has_session(&state, &headers) {
        return unauthorized();
    }
    state.sessions_killed += 1;
    (StatusCode::OK, Json(json!({})))
}

async fn search_tickets(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("Stub state poisoned");
    if !has_session(&state, &headers) {
        return unauthorized();
    }
    if let Some(token) = headers.get("Session-Token").and_then(|v| v.to_str().ok()) {
        state.session_headers.push(token.to_string());
    }
    state.search_queries.push(query);

    let rows = state.search_rows.clone();
    (
        StatusCode::OK,
        Json(json!({ "totalcount": rows.len(), "count": rows.len(), "data": rows })),
    )
}

/// A 200 answer that is not JSON
async fn maintenance_page() -> &'static str {
    "<html>Down for maintenance</html>"
}

async fn get_ticket(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let state = state.lock().expect("Stub state poisoned");
    if !has_session(&state, &headers) {
        return unauthorized().into_response();
    }
    match state.items.get(&id) {
        Some(Value::Null) => StatusCode::OK.into_response(),
        Some(item) => (StatusCode::OK, Json(item.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!(["ERROR_ITEM_NOT_FOUND", "Item not found"])),
        )
            .into_response(),
    }
}

async fn create_ticket(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("Stub state poisoned");
    if !has_session(&state, &headers) {
        return unauthorized();
    }
    state.created.push(body);
    let id = state.created_id.clone().unwrap_or_else(|| json!(STUB_CREATED_ID));
    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Item successfully added" })),
    )
}

async fn update_ticket(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("Stub state poisoned");
    if !has_session(&state, &headers) {
        return unauthorized();
    }
    if !state.items.contains_key(&id) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!(["ERROR_ITEM_NOT_FOUND", "Item not found"])),
        );
    }
    state.updated.push((id, body));
    (StatusCode::OK, Json(json!([{ (id.to_string()): true, "message": "" }])))
}

async fn delete_ticket(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("Stub state poisoned");
    if !has_session(&state, &headers) {
        return unauthorized();
    }
    if state.items.remove(&id).is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!(["ERROR_ITEM_NOT_FOUND", "Item not found"])),
        );
    }
    state.deleted.push(id);
    (StatusCode::OK, Json(json!([{ (id.to_string()): true, "message": "" }])))
}
