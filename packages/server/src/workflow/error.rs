use common::storage::StorageError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Resource {0} not found")]
    NotFound(i32),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] DbErr),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
