use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid image record: {0}")]
    InvalidRecord(String),
    #[error("unrecognized timestamp: {0}")]
    InvalidTimestamp(String),
}
