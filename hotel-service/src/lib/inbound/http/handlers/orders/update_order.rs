use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::create_order::OrderRequest;
use crate::domain::order::models::OrderId;
use crate::domain::order::ports::OrderServicePort;
use crate::inbound::http::guard::Authorized;
use crate::inbound::http::guard::Guests;
use crate::inbound::http::guard::Supervisors;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::OrderData;
use crate::inbound::http::router::AppState;

pub async fn update_order_by_supervisor(
    State(state): State<AppState>,
    _authorized: Authorized<Supervisors>,
    Path(id): Path<String>,
    Json(body): Json<OrderRequest>,
) -> Result<ApiSuccess<OrderData>, ApiError> {
    let id = OrderId::from_string(&id)?;

    state
        .order_service
        .update_order(&id, body.into())
        .await
        .map_err(ApiError::from)
        .map(|ref order| ApiSuccess::new(StatusCode::OK, order.into()))
}

/// Guests may only move an order's status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuestOrderUpdateRequest {
    pub status: String,
}

pub async fn update_order_by_guest(
    State(state): State<AppState>,
    authorized: Authorized<Guests>,
    Path(id): Path<String>,
    Json(body): Json<GuestOrderUpdateRequest>,
) -> Result<ApiSuccess<OrderData>, ApiError> {
    let id = OrderId::from_string(&id)?;
    tracing::debug!(order = %id, guest = %authorized.identity.username, "Guest updating order status");

    state
        .order_service
        .update_status(&id, body.status)
        .await
        .map_err(ApiError::from)
        .map(|ref order| ApiSuccess::new(StatusCode::OK, order.into()))
}
