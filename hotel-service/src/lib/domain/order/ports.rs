use async_trait::async_trait;

use crate::domain::order::errors::OrderError;
use crate::domain::order::models::OrderDetails;
use crate::domain::order::models::OrderFilter;
use crate::domain::order::models::OrderId;
use crate::domain::order::models::WorkOrder;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::user::models::Identity;

/// Port for work order operations.
#[async_trait]
pub trait OrderServicePort: Send + Sync + 'static {
    /// Raise a new order on behalf of `creator`.
    ///
    /// # Errors
    /// * `InvalidField` - Details fail validation
    /// * `DatabaseError` - Database operation failed
    async fn create_order(
        &self,
        creator: &Identity,
        details: OrderDetails,
    ) -> Result<WorkOrder, OrderError>;

    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_orders(
        &self,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> Result<Page<WorkOrder>, OrderError>;

    /// Rewrite every editable field of an order. Number and creator stay.
    ///
    /// # Errors
    /// * `NotFound` - Order does not exist
    /// * `InvalidField` - Details fail validation
    /// * `DatabaseError` - Database operation failed
    async fn update_order(&self, id: &OrderId, details: OrderDetails)
        -> Result<WorkOrder, OrderError>;

    /// # Errors
    /// * `NotFound` - Order does not exist
    /// * `InvalidField` - Status is blank
    /// * `DatabaseError` - Database operation failed
    async fn update_status(&self, id: &OrderId, status: String) -> Result<WorkOrder, OrderError>;

    /// # Errors
    /// * `NotFound` - Order does not exist
    /// * `DatabaseError` - Database operation failed
    async fn revoke_order(&self, id: &OrderId) -> Result<(), OrderError>;
}

/// Persistence operations for work orders.
#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn insert(&self, order: WorkOrder) -> Result<WorkOrder, OrderError>;

    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<WorkOrder>, OrderError>;

    /// Orders matching `filter`, newest first, windowed by `page`.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list(
        &self,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> Result<Page<WorkOrder>, OrderError>;

    /// # Errors
    /// * `NotFound` - Order does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, order: WorkOrder) -> Result<WorkOrder, OrderError>;

    /// # Errors
    /// * `NotFound` - Order does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &OrderId) -> Result<(), OrderError>;
}
