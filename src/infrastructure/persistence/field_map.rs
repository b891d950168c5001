use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::entities::{Ticket, TicketPriority, TicketStatus};
use crate::domain::errors::DomainError;

/// Domain attribute of a ticket that has an upstream counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketField {
    Name,
    Content,
    Status,
    Priority,
    Category,
    AssignedUser,
    AssignedGroup,
    DueDate,
    CreatedDate,
}

/// Where a ticket attribute lives upstream: `search_id` is the numbered
/// column in `search/Ticket` rows, `item_key` the key in `Ticket/{id}`
/// payloads and in write inputs.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pub field: TicketField,
    pub search_id: &'static str,
    pub item_key: &'static str,
}

const NAME: FieldMapping = FieldMapping { field: TicketField::Name, search_id: "1", item_key: "name" };
const CONTENT: FieldMapping = FieldMapping { field: TicketField::Content, search_id: "2", item_key: "content" };
const STATUS: FieldMapping = FieldMapping { field: TicketField::Status, search_id: "12", item_key: "status" };
const PRIORITY: FieldMapping = FieldMapping { field: TicketField::Priority, search_id: "3", item_key: "priority" };
const CATEGORY: FieldMapping = FieldMapping { field: TicketField::Category, search_id: "7", item_key: "itilcategories_id" };
const ASSIGNED_USER: FieldMapping = FieldMapping { field: TicketField::AssignedUser, search_id: "5", item_key: "users_id_tech" };
const ASSIGNED_GROUP: FieldMapping = FieldMapping { field: TicketField::AssignedGroup, search_id: "8", item_key: "groups_id_tech" };
const DUE_DATE: FieldMapping = FieldMapping { field: TicketField::DueDate, search_id: "18", item_key: "time_to_resolve" };
const CREATED_DATE: FieldMapping = FieldMapping { field: TicketField::CreatedDate, search_id: "15", item_key: "date" };

pub const TICKET_FIELDS: &[FieldMapping] = &[
    NAME,
    CONTENT,
    STATUS,
    PRIORITY,
    CATEGORY,
    ASSIGNED_USER,
    ASSIGNED_GROUP,
    DUE_DATE,
    CREATED_DATE,
];

pub const ID_KEY: &str = "id";

pub fn mapping(field: TicketField) -> &'static FieldMapping {
    match field {
        TicketField::Name => &NAME,
        TicketField::Content => &CONTENT,
        TicketField::Status => &STATUS,
        TicketField::Priority => &PRIORITY,
        TicketField::Category => &CATEGORY,
        TicketField::AssignedUser => &ASSIGNED_USER,
        TicketField::AssignedGroup => &ASSIGNED_GROUP,
        TicketField::DueDate => &DUE_DATE,
        TicketField::CreatedDate => &CREATED_DATE,
    }
}

pub fn search_id(field: TicketField) -> &'static str {
    mapping(field).search_id
}

pub fn item_key(field: TicketField) -> &'static str {
    mapping(field).item_key
}

#[derive(Error, Debug, PartialEq)]
pub enum DecodeError {
    #[error("ticket row is not a JSON object")]
    NotAnObject,
    #[error("field {key} is not numeric: {value}")]
    NotNumeric { key: &'static str, value: String },
    #[error(transparent)]
    OutOfRange(#[from] DomainError),
}

/// Decode one upstream row (search row or direct item) into a ticket.
///
/// Absent status/priority default to NEW/MEDIUM; a present but unknown
/// code is an error so the caller can drop just this row.
pub fn decode_ticket(row: &Value) -> Result<Ticket, DecodeError> {
    let row = row.as_object().ok_or(DecodeError::NotAnObject)?;

    let status = match lookup(row, TicketField::Status) {
        Some(value) => TicketStatus::try_from(as_code(value, item_key(TicketField::Status))?)?,
        None => TicketStatus::default(),
    };
    let priority = match lookup(row, TicketField::Priority) {
        Some(value) => {
            TicketPriority::try_from(as_code(value, item_key(TicketField::Priority))?)?
        }
        None => TicketPriority::default(),
    };

    Ok(Ticket {
        id: row.get(ID_KEY).and_then(as_id),
        name: text(row, TicketField::Name),
        content: text(row, TicketField::Content),
        status,
        priority,
        category_id: lookup(row, TicketField::Category).and_then(as_id),
        assigned_user_id: lookup(row, TicketField::AssignedUser).and_then(as_id),
        assigned_group_id: lookup(row, TicketField::AssignedGroup).and_then(as_id),
        due_date: lookup(row, TicketField::DueDate).and_then(as_datetime),
        created_date: lookup(row, TicketField::CreatedDate).and_then(as_datetime),
    })
}

/// Build the `{"input": {...}}` body for create/update. Absent optional
/// fields are left out rather than sent as null.
pub fn encode_ticket(ticket: &Ticket, id: Option<i64>) -> Value {
    let mut input = Map::new();
    if let Some(id) = id {
        input.insert(ID_KEY.to_string(), Value::from(id));
    }
    input.insert(item_key(TicketField::Name).into(), Value::from(ticket.name.clone()));
    input.insert(item_key(TicketField::Content).into(), Value::from(ticket.content.clone()));
    input.insert(item_key(TicketField::Status).into(), Value::from(ticket.status.code()));
    input.insert(item_key(TicketField::Priority).into(), Value::from(ticket.priority.code()));

    let optional_ids = [
        (TicketField::Category, ticket.category_id),
        (TicketField::AssignedUser, ticket.assigned_user_id),
        (TicketField::AssignedGroup, ticket.assigned_group_id),
    ];
    for (field, value) in optional_ids {
        if let Some(value) = value {
            input.insert(item_key(field).into(), Value::from(value));
        }
    }

    if let Some(due_date) = ticket.due_date {
        input.insert(
            item_key(TicketField::DueDate).into(),
            Value::from(due_date.format("%Y-%m-%dT%H:%M:%S").to_string()),
        );
    }

    let mut payload = Map::new();
    payload.insert("input".to_string(), Value::Object(input));
    Value::Object(payload)
}

fn lookup(row: &Map<String, Value>, field: TicketField) -> Option<&Value> {
    let mapping = mapping(field);
    row.get(mapping.search_id)
        .or_else(|| row.get(mapping.item_key))
        .filter(|value| !value.is_null())
}

fn text(row: &Map<String, Value>, field: TicketField) -> String {
    match lookup(row, field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn as_code(value: &Value, key: &'static str) -> Result<i64, DecodeError> {
    as_id(value).ok_or_else(|| DecodeError::NotNumeric {
        key,
        value: value.to_string(),
    })
}

/// Numbers arrive either as JSON numbers or as numeric strings
pub fn as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_datetime(value: &Value) -> Option<NaiveDateTime> {
    let raw = value.as_str()?.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}
