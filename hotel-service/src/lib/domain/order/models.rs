use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::order::errors::OrderError;

/// Work order unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// # Errors
    /// * `InvalidOrderId` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, OrderError> {
        Uuid::parse_str(s)
            .map(OrderId)
            .map_err(|e| OrderError::InvalidOrderId(e.to_string()))
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Maintenance or service request raised against a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrder {
    pub id: OrderId,
    /// `YYYYMMDD-HHMM-<room>`, stamped in UTC at creation.
    pub number: String,
    /// Username of the account that raised the order.
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub room_number: String,
    pub started: DateTime<Utc>,
    pub finished: Option<DateTime<Utc>>,
    pub order_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl WorkOrder {
    pub fn number_for(room_number: &str, at: DateTime<Utc>) -> String {
        format!("{}-{}", at.format("%Y%m%d-%H%M"), room_number)
    }
}

/// Fields supplied when raising or fully rewriting an order.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub assigned_to: Option<String>,
    pub room_number: String,
    pub started: DateTime<Utc>,
    pub finished: Option<DateTime<Utc>>,
    pub order_type: String,
    pub status: String,
}

impl OrderDetails {
    /// Trim text fields and reject blanks or a finish before the start.
    ///
    /// # Errors
    /// * `InvalidField` - Blank room, type or status, or `finished < started`
    pub fn validated(self) -> Result<Self, OrderError> {
        let room_number = required("room_number", self.room_number)?;
        let order_type = required("order_type", self.order_type)?;
        let status = required("status", self.status)?;

        if let Some(finished) = self.finished {
            if finished < self.started {
                return Err(OrderError::InvalidField(
                    "finished must not be before started".to_string(),
                ));
            }
        }

        Ok(Self {
            assigned_to: self
                .assigned_to
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            room_number,
            started: self.started,
            finished: self.finished,
            order_type,
            status,
        })
    }
}

/// Trimmed, non-blank status text.
///
/// # Errors
/// * `InvalidField` - Status is blank
pub fn validated_status(status: String) -> Result<String, OrderError> {
    required("status", status)
}

fn required(field: &str, value: String) -> Result<String, OrderError> {
    let value = value.trim();
    if value.is_empty() {
        Err(OrderError::InvalidField(format!("{} must not be blank", field)))
    } else {
        Ok(value.to_string())
    }
}

/// Listing filter. Empty vectors do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub statuses: Vec<String>,
    pub order_types: Vec<String>,
    pub rooms: Vec<String>,
}

impl OrderFilter {
    pub fn matches(&self, order: &WorkOrder) -> bool {
        (self.statuses.is_empty() || self.statuses.contains(&order.status))
            && (self.order_types.is_empty() || self.order_types.contains(&order.order_type))
            && (self.rooms.is_empty() || self.rooms.contains(&order.room_number))
    }
}
