use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::order::models::OrderFilter;
use crate::domain::order::ports::OrderServicePort;
use crate::domain::pagination::PageRequest;
use crate::inbound::http::handlers::split_list;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::OrderData;
use crate::inbound::http::handlers::PageData;
use crate::inbound::http::router::AppState;

/// Query string for order listings. Filters take comma separated values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindOrdersQuery {
    skip: Option<u32>,
    limit: Option<u32>,
    status: Option<String>,
    order_type: Option<String>,
    room: Option<String>,
}

impl From<&FindOrdersQuery> for OrderFilter {
    fn from(query: &FindOrdersQuery) -> Self {
        OrderFilter {
            statuses: split_list(query.status.as_deref()),
            order_types: split_list(query.order_type.as_deref()),
            rooms: split_list(query.room.as_deref()),
        }
    }
}

/// Guarded by the API token only.
pub async fn find_orders(
    State(state): State<AppState>,
    Query(query): Query<FindOrdersQuery>,
) -> Result<ApiSuccess<PageData<OrderData>>, ApiError> {
    let page = PageRequest::new(query.skip, query.limit)?;

    state
        .order_service
        .find_orders(&OrderFilter::from(&query), page)
        .await
        .map_err(ApiError::from)
        .map(|page| {
            ApiSuccess::new(
                StatusCode::OK,
                PageData::from_page(&page, |order| OrderData::from(order)),
            )
        })
}
