use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::order::models::OrderId;
use crate::domain::order::ports::OrderServicePort;
use crate::inbound::http::guard::Authorized;
use crate::inbound::http::guard::Supervisors;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn revoke_order(
    State(state): State<AppState>,
    _authorized: Authorized<Supervisors>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let id = OrderId::from_string(&id)?;

    state
        .order_service
        .revoke_order(&id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
