use thiserror::Error;

use crate::domain::user::errors::UserError;

/// Failures of the login and authorization flows.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid username or not registered")]
    UnknownUsername,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Not authenticated")]
    MissingToken,

    #[error("Could not validate credentials")]
    CouldNotValidate,

    #[error("Not enough permissions")]
    InsufficientScope,

    #[error("Inactive user")]
    Inactive,

    #[error("Unauthorized")]
    MissingRole,

    #[error("Not enough permissions")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
