use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::Uid;
use crate::domain::user::models::UpdateGuestCommand;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::guard::Authorized;
use crate::inbound::http::guard::Supervisors;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UpdateGuestRequest {
    pub room_number: Option<String>,
    pub password: Option<String>,
    pub disabled: Option<bool>,
}

impl UpdateGuestRequest {
    fn try_into_command(self) -> Result<UpdateGuestCommand, UserError> {
        Ok(UpdateGuestCommand {
            room_number: self.room_number.map(Username::new).transpose()?,
            password: self.password,
            disabled: self.disabled,
        })
    }
}

pub async fn update_guest(
    State(state): State<AppState>,
    _authorized: Authorized<Supervisors>,
    Path(uid): Path<String>,
    Json(req): Json<UpdateGuestRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let uid = Uid::from_string(&uid).map_err(UserError::from)?;
    let command = req.try_into_command()?;

    state
        .user_service
        .update_guest(&uid, command)
        .await
        .map_err(ApiError::from)
        .map(|ref record| ApiSuccess::new(StatusCode::OK, record.into()))
}
