use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::order::errors::OrderError;
use crate::domain::order::models::OrderFilter;
use crate::domain::order::models::OrderId;
use crate::domain::order::models::WorkOrder;
use crate::domain::order::ports::OrderRepository;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;

const SELECT_COLUMNS: &str = r#"
    SELECT id, number, created_by, assigned_to, room_number, started, finished,
           order_type, status, created_at
    FROM work_orders
"#;

const FILTER_CLAUSE: &str = r#"
    WHERE (cardinality($1::text[]) = 0 OR status = ANY($1))
      AND (cardinality($2::text[]) = 0 OR order_type = ANY($2))
      AND (cardinality($3::text[]) = 0 OR room_number = ANY($3))
"#;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    number: String,
    created_by: String,
    assigned_to: Option<String>,
    room_number: String,
    started: DateTime<Utc>,
    finished: Option<DateTime<Utc>>,
    order_type: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for WorkOrder {
    fn from(row: OrderRow) -> Self {
        WorkOrder {
            id: OrderId(row.id),
            number: row.number,
            created_by: row.created_by,
            assigned_to: row.assigned_to,
            room_number: row.room_number,
            started: row.started,
            finished: row.finished,
            order_type: row.order_type,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn insert(&self, order: WorkOrder) -> Result<WorkOrder, OrderError> {
        sqlx::query(
            r#"
            INSERT INTO work_orders (id, number, created_by, assigned_to, room_number,
                                     started, finished, order_type, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(order.id.0)
        .bind(&order.number)
        .bind(&order.created_by)
        .bind(&order.assigned_to)
        .bind(&order.room_number)
        .bind(order.started)
        .bind(order.finished)
        .bind(&order.order_type)
        .bind(&order.status)
        .bind(order.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| OrderError::DatabaseError(e.to_string()))?;

        Ok(order)
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<WorkOrder>, OrderError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| OrderError::DatabaseError(e.to_string()))?;

        Ok(row.map(WorkOrder::from))
    }

    async fn list(
        &self,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> Result<Page<WorkOrder>, OrderError> {
        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM work_orders {}", FILTER_CLAUSE))
                .bind(&filter.statuses)
                .bind(&filter.order_types)
                .bind(&filter.rooms)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| OrderError::DatabaseError(e.to_string()))?;

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{} {} ORDER BY created_at DESC, id ASC OFFSET $4 LIMIT $5",
            SELECT_COLUMNS, FILTER_CLAUSE
        ))
        .bind(&filter.statuses)
        .bind(&filter.order_types)
        .bind(&filter.rooms)
        .bind(i64::from(page.skip()))
        .bind(i64::from(page.limit()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| OrderError::DatabaseError(e.to_string()))?;

        Ok(Page {
            items: rows.into_iter().map(WorkOrder::from).collect(),
            total: total.max(0) as u64,
            request: page,
        })
    }

    async fn update(&self, order: WorkOrder) -> Result<WorkOrder, OrderError> {
        let result = sqlx::query(
            r#"
            UPDATE work_orders
            SET assigned_to = $2, room_number = $3, started = $4, finished = $5,
                order_type = $6, status = $7
            WHERE id = $1
            "#,
        )
        .bind(order.id.0)
        .bind(&order.assigned_to)
        .bind(&order.room_number)
        .bind(order.started)
        .bind(order.finished)
        .bind(&order.order_type)
        .bind(&order.status)
        .execute(&self.pool)
        .await
        .map_err(|e| OrderError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(OrderError::NotFound(order.id.to_string()));
        }

        Ok(order)
    }

    async fn delete(&self, id: &OrderId) -> Result<(), OrderError> {
        let result = sqlx::query("DELETE FROM work_orders WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| OrderError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(OrderError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
