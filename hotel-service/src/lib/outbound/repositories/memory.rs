//! Process-local stores for development and tests.
//!
//! Same contracts as the Postgres adapters, including the uniqueness rules
//! the database enforces through constraints.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::order::errors::OrderError;
use crate::domain::order::models::OrderFilter;
use crate::domain::order::models::OrderId;
use crate::domain::order::models::WorkOrder;
use crate::domain::order::ports::OrderRepository;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CredentialRecord;
use crate::domain::user::models::Uid;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::Username;
use crate::domain::user::ports::CredentialStore;

#[derive(Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<Uid, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Reject `candidate` if another record already holds its username or room.
fn check_unique(
    records: &HashMap<Uid, CredentialRecord>,
    candidate: &CredentialRecord,
) -> Result<(), UserError> {
    for existing in records.values() {
        if existing.identity.uid == candidate.identity.uid {
            continue;
        }
        if existing.identity.username == candidate.identity.username {
            return Err(UserError::UsernameAlreadyExists(
                candidate.identity.username.as_str().to_string(),
            ));
        }
        if let (Some(existing_room), Some(room)) =
            (&existing.profile.room_number, &candidate.profile.room_number)
        {
            if existing_room == room {
                return Err(UserError::RoomAlreadyExists(room.clone()));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn insert(&self, record: CredentialRecord) -> Result<CredentialRecord, UserError> {
        let mut records = self.records.write().await;
        check_unique(&records, &record)?;
        records.insert(record.identity.uid, record.clone());
        Ok(record)
    }

    async fn find_by_uid(&self, uid: &Uid) -> Result<Option<CredentialRecord>, UserError> {
        Ok(self.records.read().await.get(uid).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<CredentialRecord>, UserError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|record| &record.identity.username == username)
            .cloned())
    }

    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Page<CredentialRecord>, UserError> {
        let mut matches: Vec<CredentialRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|record| filter.matches(&record.identity))
            .cloned()
            .collect();
        matches.sort_by_key(|record| (record.created_at, record.identity.uid.0));

        Ok(Page::from_matches(matches, page))
    }

    async fn update(&self, record: CredentialRecord) -> Result<CredentialRecord, UserError> {
        let mut records = self.records.write().await;
        if !records.contains_key(&record.identity.uid) {
            return Err(UserError::NotFound(record.identity.uid.to_string()));
        }
        check_unique(&records, &record)?;
        records.insert(record.identity.uid, record.clone());
        Ok(record)
    }

    async fn delete(&self, uid: &Uid) -> Result<(), UserError> {
        self.records
            .write()
            .await
            .remove(uid)
            .map(|_| ())
            .ok_or(UserError::NotFound(uid.to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<OrderId, WorkOrder>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: WorkOrder) -> Result<WorkOrder, OrderError> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<WorkOrder>, OrderError> {
        Ok(self.orders.read().await.get(id).cloned())
    }

    async fn list(
        &self,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> Result<Page<WorkOrder>, OrderError> {
        let mut matches: Vec<WorkOrder> = self
            .orders
            .read()
            .await
            .values()
            .filter(|order| filter.matches(order))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });

        Ok(Page::from_matches(matches, page))
    }

    async fn update(&self, order: WorkOrder) -> Result<WorkOrder, OrderError> {
        let mut orders = self.orders.write().await;
        match orders.get_mut(&order.id) {
            Some(existing) => {
                *existing = order.clone();
                Ok(order)
            }
            None => Err(OrderError::NotFound(order.id.to_string())),
        }
    }

    async fn delete(&self, id: &OrderId) -> Result<(), OrderError> {
        self.orders
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(OrderError::NotFound(id.to_string()))
    }
}
