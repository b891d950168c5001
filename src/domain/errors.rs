use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown ticket status code: {0}")]
    UnknownStatusCode(i64),
    #[error("Unknown ticket status: {0}")]
    UnknownStatusName(String),
    #[error("Unknown ticket priority code: {0}")]
    UnknownPriorityCode(i64),
    #[error("Unknown ticket priority: {0}")]
    UnknownPriorityName(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
