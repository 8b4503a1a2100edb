use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

use crate::domain::order::models::OrderDetails;
use crate::domain::order::ports::OrderServicePort;
use crate::domain::user::models::Identity;
use crate::inbound::http::guard::Authorized;
use crate::inbound::http::guard::Guests;
use crate::inbound::http::guard::Supervisors;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::OrderData;
use crate::inbound::http::router::AppState;

/// HTTP request body carrying every editable order field (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderRequest {
    pub assigned_to: Option<String>,
    pub room_number: String,
    pub started: DateTime<Utc>,
    pub finished: Option<DateTime<Utc>>,
    pub order_type: String,
    pub status: String,
}

impl From<OrderRequest> for OrderDetails {
    fn from(req: OrderRequest) -> Self {
        OrderDetails {
            assigned_to: req.assigned_to,
            room_number: req.room_number,
            started: req.started,
            finished: req.finished,
            order_type: req.order_type,
            status: req.status,
        }
    }
}

pub async fn create_order_by_supervisor(
    State(state): State<AppState>,
    authorized: Authorized<Supervisors>,
    Json(body): Json<OrderRequest>,
) -> Result<ApiSuccess<OrderData>, ApiError> {
    create_order(&state, &authorized.identity, body).await
}

pub async fn create_order_by_guest(
    State(state): State<AppState>,
    authorized: Authorized<Guests>,
    Json(body): Json<OrderRequest>,
) -> Result<ApiSuccess<OrderData>, ApiError> {
    create_order(&state, &authorized.identity, body).await
}

async fn create_order(
    state: &AppState,
    creator: &Identity,
    body: OrderRequest,
) -> Result<ApiSuccess<OrderData>, ApiError> {
    state
        .order_service
        .create_order(creator, body.into())
        .await
        .map_err(ApiError::from)
        .map(|ref order| ApiSuccess::new(StatusCode::CREATED, order.into()))
}
