use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use subtle::ConstantTimeEq;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

pub const API_TOKEN_HEADER: &str = "x-api-token";

/// Constant-time for equal lengths; only the length can leak.
fn token_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Rejects requests whose `X-API-TOKEN` header does not match the configured
/// token. Runs before any bearer guard on the route.
pub async fn require_api_token(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let provided = req
        .headers()
        .get(API_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(token) if token_matches(token, &state.api_token) => Ok(next.run(req).await),
        Some(_) => {
            tracing::warn!(uri = %req.uri(), "Rejected request with wrong API token");
            Err(ApiError::InvalidApiToken("Invalid X-API-TOKEN header".to_string()).into_response())
        }
        None => {
            tracing::warn!(uri = %req.uri(), "Rejected request without API token");
            Err(ApiError::InvalidApiToken("Missing X-API-TOKEN header".to_string()).into_response())
        }
    }
}
