//! Bearer-token guard for protected routes.
//!
//! A handler declares what it needs by taking `Authorized<R>` where `R` is one
//! of the requirement markers below. The extractor resolves the token into an
//! [`Identity`] or rejects with the matching [`ApiError`].

use std::marker::PhantomData;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::RouteRequirement;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::Identity;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Type-level route requirement.
pub trait Requirement: Send + Sync + 'static {
    const REQUIREMENT: RouteRequirement;
}

/// Supervisors only.
pub struct Supervisors;

/// Supervisors and employees.
pub struct Staff;

pub struct Guests;

/// Any account with a role.
pub struct Members;

impl Requirement for Supervisors {
    const REQUIREMENT: RouteRequirement = RouteRequirement::SUPERVISORS;
}

impl Requirement for Staff {
    const REQUIREMENT: RouteRequirement = RouteRequirement::STAFF;
}

impl Requirement for Guests {
    const REQUIREMENT: RouteRequirement = RouteRequirement::GUESTS;
}

impl Requirement for Members {
    const REQUIREMENT: RouteRequirement = RouteRequirement::MEMBERS;
}

/// Identity that passed requirement `R`.
#[derive(Debug, Clone)]
pub struct Authorized<R> {
    pub identity: Identity,
    requirement: PhantomData<R>,
}

impl<R> Authorized<R> {
    pub fn into_identity(self) -> Identity {
        self.identity
    }
}

/// Token from an `Authorization: Bearer <token>` header. The scheme is
/// matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

#[async_trait]
impl<R> FromRequestParts<AppState> for Authorized<R>
where
    R: Requirement,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let requirement = R::REQUIREMENT;

        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::from_auth(AuthError::MissingToken, requirement.challenge()))?;

        let identity = state
            .auth_service
            .authorize(token, &requirement)
            .await
            .map_err(|e| {
                tracing::warn!(
                    uri = %parts.uri,
                    error = %e,
                    "Request rejected by route guard"
                );
                ApiError::from_auth(e, requirement.challenge())
            })?;

        Ok(Self {
            identity,
            requirement: PhantomData,
        })
    }
}
