use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateGuestCommand;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::guard::Authorized;
use crate::inbound::http::guard::Supervisors;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;

/// Check-in: one guest account per room, the room number is the username.
pub async fn create_guest(
    State(state): State<AppState>,
    _authorized: Authorized<Supervisors>,
    Json(body): Json<CreateGuestRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let room_number = Username::new(body.room_number).map_err(UserError::from)?;
    if body.password.is_empty() {
        return Err(ApiError::UnprocessableEntity(
            "Password must not be empty".to_string(),
        ));
    }

    state
        .user_service
        .create_guest(CreateGuestCommand {
            room_number,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)
        .map(|ref record| ApiSuccess::new(StatusCode::CREATED, record.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateGuestRequest {
    room_number: String,
    password: String,
}
