// src/models/service_order.rs

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

use crate::models::sale::LineItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "service_order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceOrderStatus {
    Pending,
    InProgress,
    Completed,
    Delivered,
}

impl ServiceOrderStatus {
    /// O fluxo só anda para frente: PENDING → IN_PROGRESS → COMPLETED → DELIVERED.
    pub fn can_transition_to(self, next: ServiceOrderStatus) -> bool {
        (next as u8) == (self as u8) + 1
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: Uuid,
    pub customer_id: Uuid,

    #[schema(example = "Revisão completa + troca de óleo")]
    pub description: Option<String>,

    pub status: ServiceOrderStatus,

    #[schema(example = "320.00")]
    pub total_amount: Decimal,

    pub entry_date: DateTime<Utc>,
    pub exit_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderItem {
    pub id: Uuid,
    pub service_order_id: Uuid,
    pub product_id: Uuid,
    #[schema(example = 1)]
    pub quantity: i32,
    #[schema(example = "80.00")]
    pub unit_price: Decimal,
}

impl From<&ServiceOrderItem> for LineItem {
    fn from(item: &ServiceOrderItem) -> Self {
        LineItem::new(item.product_id, item.quantity, item.unit_price)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderDetail {
    #[serde(flatten)]
    pub header: ServiceOrder,
    pub customer_name: String,
    pub items: Vec<ServiceOrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_moves_forward() {
        use ServiceOrderStatus::*;

        assert!(Pending.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Delivered));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Delivered.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Pending.can_transition_to(Pending));
    }
}
