use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::guard::Authorized;
use crate::inbound::http::guard::Members;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;

pub async fn current_user(
    State(state): State<AppState>,
    authorized: Authorized<Members>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_service
        .get_user(&authorized.identity.uid)
        .await
        .map_err(ApiError::from)
        .map(|ref record| ApiSuccess::new(StatusCode::OK, record.into()))
}
