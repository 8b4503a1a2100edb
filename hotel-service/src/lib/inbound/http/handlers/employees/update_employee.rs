use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::Role;
use crate::domain::user::models::Uid;
use crate::domain::user::models::UpdateEmployeeCommand;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::guard::Authorized;
use crate::inbound::http::guard::Staff;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating staff (raw JSON). Absent fields are kept.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub position: Option<String>,
    pub disabled: Option<bool>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub nickname: Option<String>,
    pub tel: Option<String>,
}

impl UpdateEmployeeRequest {
    fn try_into_command(self) -> Result<UpdateEmployeeCommand, UserError> {
        let username = self.username.map(Username::new).transpose()?;
        let role = self
            .role
            .map(|tag| Role::parse(&tag).ok_or(UserError::InvalidRole(tag)))
            .transpose()?;

        Ok(UpdateEmployeeCommand {
            username,
            password: self.password,
            role,
            position: self.position,
            disabled: self.disabled,
            firstname: self.firstname,
            lastname: self.lastname,
            nickname: self.nickname,
            tel: self.tel,
        })
    }
}

pub async fn update_employee(
    State(state): State<AppState>,
    authorized: Authorized<Staff>,
    Path(uid): Path<String>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let uid = Uid::from_string(&uid).map_err(UserError::from)?;
    let command = req.try_into_command()?;

    state
        .user_service
        .update_employee(&authorized.identity, &uid, command)
        .await
        .map_err(ApiError::from)
        .map(|ref record| ApiSuccess::new(StatusCode::OK, record.into()))
}
