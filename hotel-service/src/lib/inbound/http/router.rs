use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::HeaderValue;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::AllowHeaders;
use tower_http::cors::AllowMethods;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::auth::current_user::current_user;
use super::handlers::auth::login::login;
use super::handlers::auth::status::system_status;
use super::handlers::employees::create_employee::create_employee;
use super::handlers::employees::delete_employee::delete_employee;
use super::handlers::employees::find_employees::find_employees;
use super::handlers::employees::update_employee::update_employee;
use super::handlers::guests::create_guest::create_guest;
use super::handlers::guests::find_guests::find_guests;
use super::handlers::guests::update_guest::update_guest;
use super::handlers::orders::create_order::create_order_by_guest;
use super::handlers::orders::create_order::create_order_by_supervisor;
use super::handlers::orders::find_orders::find_orders;
use super::handlers::orders::revoke_order::revoke_order;
use super::handlers::orders::update_order::update_order_by_guest;
use super::handlers::orders::update_order::update_order_by_supervisor;
use super::middleware::require_api_token;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::order::ports::OrderServicePort;
use crate::domain::user::ports::UserServicePort;

/// Explicit server context shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub user_service: Arc<dyn UserServicePort>,
    pub order_service: Arc<dyn OrderServicePort>,
    /// Expected `X-API-TOKEN` value on gated route groups.
    pub api_token: String,
}

pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let auth_routes = Router::new()
        .route("/auth/token", post(login))
        .route("/auth/user/me", get(current_user))
        .route("/auth/status", get(system_status));

    let employee_routes = Router::new()
        .route("/find", get(find_employees))
        .route("/create", post(create_employee))
        .route("/update/:uid", put(update_employee))
        .route("/delete/:uid", delete(delete_employee));

    let guest_routes = Router::new()
        .route("/find", get(find_guests))
        .route("/create", post(create_guest))
        .route("/update/:uid", put(update_guest));

    let order_routes = Router::new()
        .route("/find", get(find_orders))
        .route("/create-supervisor", post(create_order_by_supervisor))
        .route("/update-supervisor/:id", put(update_order_by_supervisor))
        .route("/revoke/:id", delete(revoke_order))
        .route("/create-guest", post(create_order_by_guest))
        .route("/update-guest/:id", put(update_order_by_guest));

    let api_token_layer = middleware::from_fn_with_state(state.clone(), require_api_token);
    let gated_routes = Router::new()
        .nest("/employee", employee_routes)
        .nest("/guest", guest_routes)
        .nest("/order", order_routes)
        .route_layer(api_token_layer);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(auth_routes)
        .merge(gated_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(cors_layer(allowed_origins)),
        )
        .with_state(state)
}

/// CORS restricted to the configured origins. Unparseable entries are skipped.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
