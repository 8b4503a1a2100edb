use axum::http::header::WWW_AUTHENTICATE;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::auth::errors::AuthError;
use crate::domain::order::errors::OrderError;
use crate::domain::order::models::WorkOrder;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequestError;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CredentialRecord;

pub mod auth;
pub mod employees;
pub mod guests;
pub mod orders;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    InvalidCredentials(String),
    /// 401 carrying a `WWW-Authenticate` challenge.
    Unauthorized {
        message: String,
        challenge: String,
    },
    InvalidApiToken(String),
    Forbidden(String),
    InactiveUser(String),
}

impl ApiError {
    /// Stable machine-readable tag written into every error body.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "internal",
            ApiError::UnprocessableEntity(_) => "unprocessable_entity",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::InvalidCredentials(_) => "invalid_credentials",
            ApiError::Unauthorized { .. } => "unauthorized",
            ApiError::InvalidApiToken(_) => "invalid_api_token",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::InactiveUser(_) => "inactive_user",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) | ApiError::InactiveUser(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InvalidCredentials(_)
            | ApiError::Unauthorized { .. }
            | ApiError::InvalidApiToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Map an authorization failure, advertising `challenge` on 401s.
    pub fn from_auth(err: AuthError, challenge: String) -> Self {
        match err {
            AuthError::UnknownUsername | AuthError::InvalidPassword => {
                ApiError::InvalidCredentials(err.to_string())
            }
            AuthError::MissingToken
            | AuthError::CouldNotValidate
            | AuthError::InsufficientScope
            | AuthError::MissingRole => ApiError::Unauthorized {
                message: err.to_string(),
                challenge,
            },
            AuthError::Inactive => ApiError::InactiveUser(err.to_string()),
            AuthError::Forbidden => ApiError::Forbidden(err.to_string()),
            AuthError::Internal(_) => ApiError::InternalServerError(err.to_string()),
        }
    }

    pub fn not_found_item() -> Self {
        ApiError::NotFound("Not found item.".to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        let (message, challenge) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                ("Internal server error".to_string(), None)
            }
            ApiError::Unauthorized { message, challenge } => (message, Some(challenge)),
            ApiError::UnprocessableEntity(msg)
            | ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::InvalidCredentials(msg)
            | ApiError::InvalidApiToken(msg)
            | ApiError::Forbidden(msg)
            | ApiError::InactiveUser(msg) => (msg, None),
        };

        let mut response =
            (status, Json(ApiResponseBody::new_error(status, kind, message))).into_response();

        if let Some(challenge) = challenge {
            match HeaderValue::from_str(&challenge) {
                Ok(value) => {
                    response.headers_mut().insert(WWW_AUTHENTICATE, value);
                }
                Err(e) => tracing::error!(error = %e, "Invalid WWW-Authenticate challenge"),
            }
        }

        response
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::from_auth(err, "Bearer".to_string())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) | UserError::NotFoundByUsername(_) => {
                ApiError::NotFound(err.to_string())
            }
            UserError::UsernameAlreadyExists(_) | UserError::RoomAlreadyExists(_) => {
                ApiError::Conflict(err.to_string())
            }
            UserError::InvalidUsername(_) | UserError::InvalidRole(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            UserError::InvalidUid(_) => ApiError::BadRequest(err.to_string()),
            UserError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
            UserError::DatabaseError(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::InvalidOrderId(_) => ApiError::BadRequest(err.to_string()),
            OrderError::InvalidField(_) => ApiError::UnprocessableEntity(err.to_string()),
            OrderError::NotFound(_) => ApiError::NotFound(err.to_string()),
            OrderError::DatabaseError(_) | OrderError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<PageRequestError> for ApiError {
    fn from(err: PageRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, kind: &str, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData {
                kind: kind.to_string(),
                message,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub kind: String,
    pub message: String,
}

/// Account as exposed over HTTP. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub uid: String,
    pub username: String,
    pub role: Option<String>,
    pub position: Option<String>,
    pub disabled: bool,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub nickname: Option<String>,
    pub tel: Option<String>,
    pub room_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&CredentialRecord> for UserData {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            uid: record.identity.uid.to_string(),
            username: record.identity.username.as_str().to_string(),
            role: record.identity.role.map(|role| role.as_str().to_string()),
            position: record.identity.position.clone(),
            disabled: record.identity.disabled,
            firstname: record.profile.firstname.clone(),
            lastname: record.profile.lastname.clone(),
            nickname: record.profile.nickname.clone(),
            tel: record.profile.tel.clone(),
            room_number: record.profile.room_number.clone(),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderData {
    pub id: String,
    pub number: String,
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub room_number: String,
    pub started: DateTime<Utc>,
    pub finished: Option<DateTime<Utc>>,
    pub order_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&WorkOrder> for OrderData {
    fn from(order: &WorkOrder) -> Self {
        Self {
            id: order.id.to_string(),
            number: order.number.clone(),
            created_by: order.created_by.clone(),
            assigned_to: order.assigned_to.clone(),
            room_number: order.room_number.clone(),
            started: order.started,
            finished: order.finished,
            order_type: order.order_type.clone(),
            status: order.status.clone(),
            created_at: order.created_at,
        }
    }
}

/// One page of a listing: `{counts, skip, limit, items}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageData<T: Serialize + PartialEq> {
    pub counts: u64,
    pub skip: u32,
    pub limit: u32,
    pub items: Vec<T>,
}

impl<T: Serialize + PartialEq> PageData<T> {
    pub fn from_page<S>(page: &Page<S>, f: impl Fn(&S) -> T) -> Self {
        Self {
            counts: page.total,
            skip: page.request.skip(),
            limit: page.request.limit(),
            items: page.items.iter().map(f).collect(),
        }
    }
}

/// Split a comma separated query value, dropping blanks.
pub(crate) fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
