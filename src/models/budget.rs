// src/models/budget.rs

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

use crate::models::sale::LineItem;

// --- Status do Orçamento ---
// PENDING é editável. APPROVED gera exatamente uma venda. REJECTED é terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "budget_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: BudgetStatus,

    #[schema(example = "150.50")]
    pub total_amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2026-08-01")]
    pub budget_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2026-08-31")]
    pub valid_until: NaiveDate,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    pub id: Uuid,
    pub budget_id: Uuid,
    pub product_id: Uuid,
    #[schema(example = 2)]
    pub quantity: i32,
    #[schema(example = "49.90")]
    pub unit_price: Decimal,
}

impl From<&BudgetItem> for LineItem {
    fn from(item: &BudgetItem) -> Self {
        LineItem::new(item.product_id, item.quantity, item.unit_price)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetDetail {
    #[serde(flatten)]
    pub header: Budget,
    pub customer_name: String,
    pub items: Vec<BudgetItem>,
}
