use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::pagination::PageRequest;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::Role;
use crate::domain::user::models::UserFilter;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::guard::Authorized;
use crate::inbound::http::guard::Staff;
use crate::inbound::http::handlers::split_list;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::PageData;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;

/// Query string for staff listings. `position` and `role` take comma
/// separated values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindEmployeesQuery {
    skip: Option<u32>,
    limit: Option<u32>,
    position: Option<String>,
    role: Option<String>,
}

impl FindEmployeesQuery {
    fn filter(&self) -> Result<UserFilter, UserError> {
        let mut roles = split_list(self.role.as_deref())
            .iter()
            .map(|tag| Role::parse(tag).ok_or_else(|| UserError::InvalidRole(tag.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        if roles.is_empty() {
            roles = vec![Role::Supervisor, Role::Employee];
        }

        Ok(UserFilter {
            roles,
            positions: split_list(self.position.as_deref()),
        })
    }
}

pub async fn find_employees(
    State(state): State<AppState>,
    _authorized: Authorized<Staff>,
    Query(query): Query<FindEmployeesQuery>,
) -> Result<ApiSuccess<PageData<UserData>>, ApiError> {
    let filter = query.filter()?;
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
