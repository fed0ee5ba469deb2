// src/models/backup.rs

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use utoipa::ToSchema;

use crate::models::{
    budget::BudgetStatus,
    product::ProductKind,
    sale::{PaymentMethod, SaleStatus},
    service_order::ServiceOrderStatus,
};

// Formato do arquivo de backup: um único JSON cujas chaves de topo são os
// nomes das coleções. Cada documento carrega "_id" para o round-trip dos
// identificadores; itens de linha vão embutidos no documento pai.

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupFile {
    pub customers: Vec<CustomerDoc>,
    pub products: Vec<ProductDoc>,
    pub budgets: Vec<BudgetDoc>,
    pub sales: Vec<SaleDoc>,
    pub service_orders: Vec<ServiceOrderDoc>,
    pub discards: Vec<DiscardDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupLineItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDoc {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDoc {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub kind: ProductKind,
    pub price: Decimal,
    pub cost: Decimal,
    pub quantity: Option<i32>,
    pub low_stock_threshold: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetDoc {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: BudgetStatus,
    pub total_amount: Decimal,
    pub budget_date: NaiveDate,
    pub valid_until: NaiveDate,
    pub notes: Option<String>,
    pub items: Vec<BackupLineItem>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDoc {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub budget_id: Option<Uuid>,
    pub status: SaleStatus,
    pub payment_method: PaymentMethod,
    pub total_amount: Decimal,
    pub down_payment: Decimal,
    pub amount_receivable: Decimal,
    pub sale_date: DateTime<Utc>,
    pub items: Vec<BackupLineItem>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderDoc {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub description: Option<String>,
    pub status: ServiceOrderStatus,
    pub total_amount: Decimal,
    pub entry_date: DateTime<Utc>,
    pub exit_date: Option<DateTime<Utc>>,
    pub items: Vec<BackupLineItem>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscardDoc {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub reason: String,
    pub discard_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
