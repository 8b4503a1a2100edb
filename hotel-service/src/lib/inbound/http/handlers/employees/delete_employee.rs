use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::Uid;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::guard::Authorized;
use crate::inbound::http::guard::Supervisors;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn delete_employee(
    State(state): State<AppState>,
    authorized: Authorized<Supervisors>,
    Path(uid): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let uid = Uid::from_string(&uid).map_err(UserError::from)?;
    if uid == authorized.identity.uid {
        return Err(ApiError::Forbidden(
            "Supervisors cannot delete their own account".to_string(),
        ));
    }

    state
        .user_service
        .delete_user(&uid)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
