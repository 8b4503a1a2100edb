use axum::async_trait;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Form;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// OAuth2 password grant: exchange credentials and requested scopes for a token.
///
/// Success is the bare token object OAuth2 clients expect, not the
/// `{status_code, data}` envelope. Failures still use the error envelope.
pub async fn login(
    State(state): State<AppState>,
    LoginRequest(command): LoginRequest,
) -> Result<Json<LoginResponseData>, ApiError> {
    let username = command.username.clone();

    state
        .auth_service
        .login(command)
        .await
        .map_err(|e| {
            tracing::warn!(username = %username, error = %e, "Login failed");
            ApiError::from(e)
        })
        .map(|ref token| Json(token.into()))
}

/// Login body, read from either an `application/x-www-form-urlencoded`
/// password grant or JSON.
#[derive(Debug, Clone)]
pub struct LoginRequest(pub LoginCommand);

#[async_trait]
impl<S> FromRequest<S> for LoginRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| {
                value.starts_with("application/x-www-form-urlencoded")
            });

        if is_form {
            let Form(form) = Form::<PasswordGrantForm>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(form.into()))
        } else {
            let Json(body) = Json::<LoginRequestBody>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(body.into()))
        }
    }
}

/// Form fields of the password grant. `scope` is space separated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordGrantForm {
    username: String,
    password: String,
    #[serde(default)]
    scope: String,
}

impl From<PasswordGrantForm> for LoginCommand {
    fn from(form: PasswordGrantForm) -> Self {
        LoginCommand {
            username: form.username,
            password: form.password,
            scopes: form.scope.split_whitespace().map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
    #[serde(default)]
    scopes: Vec<String>,
}

impl From<LoginRequestBody> for LoginCommand {
    fn from(body: LoginRequestBody) -> Self {
        LoginCommand {
            username: body.username,
            password: body.password,
            scopes: body.scopes.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&auth::AccessToken> for LoginResponseData {
    fn from(token: &auth::AccessToken) -> Self {
        Self {
            access_token: token.access_token.clone(),
            token_type: token.token_type.to_string(),
            expires_at: token.expires_at,
        }
    }
}
