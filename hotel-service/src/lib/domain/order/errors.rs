use thiserror::Error;

/// Error for work order operations
#[derive(Debug, Clone, Error)]
pub enum OrderError {
    #[error("Invalid order ID: {0}")]
    InvalidOrderId(String),

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for OrderError {
    fn from(err: anyhow::Error) -> Self {
        OrderError::Unknown(err.to_string())
    }
}
