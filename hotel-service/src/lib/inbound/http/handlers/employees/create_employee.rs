use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::user::errors::UsernameError;
use crate::domain::user::models::CreateEmployeeCommand;
use crate::domain::user::models::Role;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::guard::Authorized;
use crate::inbound::http::guard::Supervisors;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;

pub async fn create_employee(
    State(state): State<AppState>,
    authorized: Authorized<Supervisors>,
    Json(body): Json<CreateEmployeeRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let command = body.try_into_command()?;
    tracing::debug!(actor = %authorized.identity.username, "Creating staff account");

    state
        .user_service
        .create_employee(command)
        .await
        .map_err(ApiError::from)
        .map(|ref record| ApiSuccess::new(StatusCode::CREATED, record.into()))
}

/// HTTP request body for registering staff (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateEmployeeRequest {
    username: String,
    password: String,
    role: String,
    position: Option<String>,
    firstname: String,
    lastname: String,
    nickname: Option<String>,
    tel: String,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateEmployeeRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Unknown role: {0}")]
    Role(String),

    #[error("Password must not be empty")]
    EmptyPassword,
}

impl CreateEmployeeRequest {
    fn try_into_command(self) -> Result<CreateEmployeeCommand, ParseCreateEmployeeRequestError> {
        let username = Username::new(self.username)?;
        let role = Role::parse(&self.role).ok_or(ParseCreateEmployeeRequestError::Role(self.role))?;
        if self.password.is_empty() {
            return Err(ParseCreateEmployeeRequestError::EmptyPassword);
        }

        Ok(CreateEmployeeCommand {
            username,
            password: self.password,
            role,
            position: self.position,
            firstname: self.firstname,
            lastname: self.lastname,
            nickname: self.nickname,
            tel: self.tel,
        })
    }
}

impl From<ParseCreateEmployeeRequestError> for ApiError {
    fn from(err: ParseCreateEmployeeRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
