use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::order::errors::OrderError;
use crate::domain::order::models::validated_status;
use crate::domain::order::models::OrderDetails;
use crate::domain::order::models::OrderFilter;
use crate::domain::order::models::OrderId;
use crate::domain::order::models::WorkOrder;
use crate::domain::order::ports::OrderRepository;
use crate::domain::order::ports::OrderServicePort;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::user::models::Identity;

pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }

    async fn find_existing(&self, id: &OrderId) -> Result<WorkOrder, OrderError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(OrderError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl OrderServicePort for OrderService {
    async fn create_order(
        &self,
        creator: &Identity,
        details: OrderDetails,
    ) -> Result<WorkOrder, OrderError> {
        let details = details.validated()?;
        let now = Utc::now();

        let order = WorkOrder {
            id: OrderId::new(),
            number: WorkOrder::number_for(&details.room_number, now),
            created_by: creator.username.as_str().to_string(),
            assigned_to: details.assigned_to,
            room_number: details.room_number,
            started: details.started,
            finished: details.finished,
            order_type: details.order_type,
            status: details.status,
            created_at: now,
        };

        let created = self.repository.insert(order).await?;
        tracing::info!(
            id = %created.id,
            number = %created.number,
            created_by = %created.created_by,
            "Work order created"
        );

        Ok(created)
    }

    async fn find_orders(
        &self,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> Result<Page<WorkOrder>, OrderError> {
        self.repository.list(filter, page).await
    }

    async fn update_order(
        &self,
        id: &OrderId,
        details: OrderDetails,
    ) -> Result<WorkOrder, OrderError> {
        let details = details.validated()?;
        let mut order = self.find_existing(id).await?;

        order.assigned_to = details.assigned_to;
        order.room_number = details.room_number;
        order.started = details.started;
        order.finished = details.finished;
        order.order_type = details.order_type;
        order.status = details.status;

        let updated = self.repository.update(order).await?;
        tracing::info!(id = %id, status = %updated.status, "Work order updated");

        Ok(updated)
    }

    async fn update_status(&self, id: &OrderId, status: String) -> Result<WorkOrder, OrderError> {
        let status = validated_status(status)?;
        let mut order = self.find_existing(id).await?;
        order.status = status;

        let updated = self.repository.update(order).await?;
        tracing::info!(id = %id, status = %updated.status, "Work order status changed");

        Ok(updated)
    }

    async fn revoke_order(&self, id: &OrderId) -> Result<(), OrderError> {
        self.repository.delete(id).await?;
        tracing::info!(id = %id, "Work order revoked");

        Ok(())
    }
}
