mod helpers;

use chrono::NaiveDate;
use helpers::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use ticketgate::domain::entities::{Ticket, TicketPriority, TicketStatus};
use ticketgate::domain::ports::ticket_repository::{TicketRepository, TicketRepositoryFactory};
use ticketgate::infrastructure::persistence::{GlpiRepositoryFactory, GlpiTicketRepository};
use ticketgate::infrastructure::providers::GlpiClient;

fn repository(upstream: &StubUpstream) -> GlpiTicketRepository {
    GlpiTicketRepository::new(GlpiClient::new(upstream.config()).unwrap())
}

#[tokio::test]
async fn test_list_all_fetches_first_page_and_drops_bad_rows() {
    let upstream = StubUpstream::start_with(StubState {
        search_rows: vec![
            search_row(1, "VPN outage", 2),
            search_row(2, "Broken status", 99),
            search_row(3, "Laptop request", 6),
        ],
        ..Default::default()
    })
    .await;
    let repo = repository(&upstream);

    let tickets = repo.list_all().await;

    let ids: Vec<_> = tickets.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![Some(1), Some(3)]);
    assert_eq!(tickets[0].status, TicketStatus::Assigned);
    assert_eq!(tickets[0].content, "VPN outage details");
    assert_eq!(tickets[1].status, TicketStatus::Closed);

    upstream.with_state(|state| {
        assert_eq!(state.search_queries.len(), 1);
        assert_eq!(state.search_queries[0].get("range").map(String::as_str), Some("0-49"));
    });
}

#[tokio::test]
async fn test_list_all_is_empty_when_upstream_rejects_login() {
    let upstream = StubUpstream::start_with(StubState {
        withhold_session_token: true,
        search_rows: vec![search_row(1, "VPN outage", 2)],
        ..Default::default()
    })
    .await;

    assert!(repository(&upstream).list_all().await.is_empty());
}

#[tokio::test]
async fn test_get_by_id_decodes_item() {
    let upstream = StubUpstream::start_with(StubState {
        items: HashMap::from([(7, item(7, "Mail relay down", 4))]),
        ..Default::default()
    })
    .await;
    let repo = repository(&upstream);

    let ticket = repo.get_by_id(7).await.expect("ticket 7 should exist");

    assert_eq!(ticket.id, Some(7));
    assert_eq!(ticket.name, "Mail relay down");
    assert_eq!(ticket.status, TicketStatus::Waiting);
    assert_eq!(ticket.priority, TicketPriority::High);
    assert_eq!(
        ticket.due_date,
        NaiveDate::from_ymd_opt(2026, 11, 30).and_then(|d| d.and_hms_opt(17, 0, 0))
    );
    assert!(ticket.created_date.is_some());
}

#[tokio::test]
async fn test_get_by_id_missing_is_none() {
    let upstream = StubUpstream::start().await;
    assert!(repository(&upstream).get_by_id(404).await.is_none());
}

#[tokio::test]
async fn test_create_sends_input_and_takes_upstream_id() {
    let upstream = StubUpstream::start().await;
    let repo = repository(&upstream);

    let ticket = Ticket::new("Printer jammed", "Third floor printer")
        .with_priority(TicketPriority::VeryHigh);
    let created = repo.create(ticket).await.expect("create should succeed");

    assert_eq!(created.id, Some(STUB_CREATED_ID));
    assert_eq!(created.name, "Printer jammed");
    upstream.with_state(|state| {
        assert_eq!(
            state.created,
            vec![json!({
                "input": {
                    "name": "Printer jammed",
                    "content": "Third floor printer",
                    "status": 1,
                    "priority": 5,
                }
            })]
        );
    });
}

#[tokio::test]
async fn test_get_by_id_empty_body_is_none() {
    let upstream = StubUpstream::start_with(StubState {
        items: HashMap::from([(7, Value::Null)]),
        ..Default::default()
    })
    .await;

    assert!(repository(&upstream).get_by_id(7).await.is_none());
}

#[tokio::test]
async fn test_create_accepts_string_id() {
    let upstream = StubUpstream::start_with(StubState {
        created_id: Some(json!("57")),
        ..Default::default()
    })
    .await;
    let repo = repository(&upstream);

    let created = repo
        .create(Ticket::new("Printer jammed", "Third floor printer"))
        .await
        .expect("create should succeed");

    assert_eq!(created.id, Some(57));
}

#[tokio::test]
async fn test_create_invalid_ticket_never_calls_upstream() {
    let upstream = StubUpstream::start().await;
    let repo = repository(&upstream);

    assert!(repo.create(Ticket::new("", "no name")).await.is_none());
    upstream.with_state(|state| {
        assert!(state.created.is_empty());
        assert_eq!(state.sessions_opened, 0);
    });
}

#[tokio::test]
async fn test_update_sends_id_in_input() {
    let upstream = StubUpstream::start_with(StubState {
        items: HashMap::from([(7, item(7, "Mail relay down", 4))]),
        ..Default::default()
    })
    .await;
    let repo = repository(&upstream);

    let ticket = Ticket::new("Mail relay down", "Restarted postfix")
        .with_status(TicketStatus::Solved);
    let updated = repo.update(7, ticket).await.expect("update should succeed");

    assert_eq!(updated.id, Some(7));
    upstream.with_state(|state| {
        let (id, body) = &state.updated[0];
        assert_eq!(*id, 7);
        assert_eq!(body["input"]["id"], json!(7));
        assert_eq!(body["input"]["status"], json!(5));
    });
}

#[tokio::test]
async fn test_update_missing_ticket_is_none() {
    let upstream = StubUpstream::start().await;
    let repo = repository(&upstream);

    assert!(repo.update(8, Ticket::new("Ghost", "Nobody home")).await.is_none());
}

#[tokio::test]
async fn test_delete_reports_upstream_outcome() {
    let upstream = StubUpstream::start_with(StubState {
        items: HashMap::from([(7, item(7, "Mail relay down", 4))]),
        ..Default::default()
    })
    .await;
    let repo = repository(&upstream);

    assert!(repo.delete(7).await);
    assert!(!repo.delete(7).await);
    upstream.with_state(|state| assert_eq!(state.deleted, vec![7]));
}

#[tokio::test]
async fn test_search_by_project_tag_sends_name_criteria() {
    let upstream = StubUpstream::start_with(StubState {
        search_rows: vec![search_row(11, "PROJECT-ALPHA kickoff", 5)],
        ..Default::default()
    })
    .await;
    let repo = repository(&upstream);

    let tickets = repo.search_by_project_tag("PROJECT-ALPHA").await;

    assert_eq!(tickets.len(), 1);
    upstream.with_state(|state| {
        let query = &state.search_queries[0];
        let get = |key: &str| query.get(key).map(String::as_str);
        assert_eq!(get("criteria[0][field]"), Some("1"));
        assert_eq!(get("criteria[0][searchtype]"), Some("contains"));
        assert_eq!(get("criteria[0][value]"), Some("%PROJECT-ALPHA%"));
        assert_eq!(get("range"), Some("0-49"));
    });
}

#[tokio::test]
async fn test_factory_opens_one_session_per_repository() {
    let upstream = StubUpstream::start().await;
    let factory = GlpiRepositoryFactory::new(upstream.config()).unwrap();

    factory.repository().list_all().await;
    factory.repository().list_all().await;

    upstream.with_state(|state| assert_eq!(state.sessions_opened, 2));
}
