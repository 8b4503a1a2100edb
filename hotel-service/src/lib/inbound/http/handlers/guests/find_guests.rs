use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::pagination::PageRequest;
use crate::domain::user::models::Role;
use crate::domain::user::models::UserFilter;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::guard::Authorized;
use crate::inbound::http::guard::Supervisors;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::PageData;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct FindGuestsQuery {
    skip: Option<u32>,
    limit: Option<u32>,
}

pub async fn find_guests(
    State(state): State<AppState>,
    _authorized: Authorized<Supervisors>,
    Query(query): Query<FindGuestsQuery>,
) -> Result<ApiSuccess<PageData<UserData>>, ApiError> {
    let filter = UserFilter {
        roles: vec![Role::Guest],
        positions: Vec::new(),
    };
    let page = PageRequest::new(query.skip, query.limit)?;

    let page = state.user_service.list_users(&filter, page).await?;
    if page.is_empty() {
        return Err(ApiError::not_found_item());
    }

    Ok(ApiSuccess::new(
        StatusCode::OK,
        PageData::from_page(&page, |record| UserData::from(record)),
    ))
}
