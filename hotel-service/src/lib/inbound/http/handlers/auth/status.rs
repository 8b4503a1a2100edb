use axum::http::StatusCode;
use serde::Serialize;

use crate::inbound::http::guard::Authorized;
use crate::inbound::http::guard::Members;
use crate::inbound::http::handlers::ApiSuccess;

/// Liveness check for signed-in clients.
pub async fn system_status(_authorized: Authorized<Members>) -> ApiSuccess<StatusData> {
    ApiSuccess::new(
        StatusCode::OK,
        StatusData {
            status: true,
            service: "Hotel service".to_string(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusData {
    pub status: bool,
    pub service: String,
}
