use thiserror::Error;

/// Failure taxonomy shared by every layer. The API maps each variant onto an
/// HTTP status, so which variant a function returns is part of its contract.
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Identity(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl SlotError {
    /// The bare rule message for validation failures, the full rendering for
    /// everything else.
    pub fn message(&self) -> String {
        match self {
            SlotError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

pub type SlotResult<T> = Result<T, SlotError>;
