use my_space_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("not signed in")]
    Unauthenticated,
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("failed to fetch image list: {0}")]
    ListingFetch(String),
    #[error("delete failed: {0}")]
    Delete(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("persistence error: {0}")]
    Persistence(String),
}
