// src/models/sale.rs

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "sale_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    Paid,    // Quitada
    Pending, // A receber
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Pix,
    Transfer,
}

// --- Item de Linha ---
// A tupla (produto, quantidade, preço unitário congelado) embutida em
// orçamentos, vendas e ordens de serviço. O preço NÃO é relido do produto
// na conversão: editar o produto depois não altera documentos antigos.

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 2)]
    pub quantity: i32,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "49.90")]
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn new(product_id: Uuid, quantity: i32, unit_price: Decimal) -> Self {
        Self { product_id, quantity, unit_price }
    }
}

/// Soma de quantidade × preço unitário de todos os itens.
/// Calculada no momento de salvar o documento, nunca recalculada pelo banco.
pub fn total_amount(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .map(|item| Decimal::from(item.quantity) * item.unit_price)
        .sum()
}

/// Saldo a receber: total menos entrada quando PENDING, zero quando PAID.
pub fn amount_receivable(status: SaleStatus, total: Decimal, down_payment: Decimal) -> Decimal {
    match status {
        SaleStatus::Paid => Decimal::ZERO,
        SaleStatus::Pending => total - down_payment,
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub customer_id: Uuid,

    // Back-reference: qual orçamento esta venda atende (se veio de conversão).
    pub budget_id: Option<Uuid>,

    pub status: SaleStatus,
    pub payment_method: PaymentMethod,

    #[schema(example = "150.50")]
    pub total_amount: Decimal,
    #[schema(example = "50.00")]
    pub down_payment: Decimal,
    #[schema(example = "100.50")]
    pub amount_receivable: Decimal,

    pub sale_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    #[schema(example = 2)]
    pub quantity: i32,
    #[schema(example = "49.90")]
    pub unit_price: Decimal,
}

impl From<&SaleItem> for LineItem {
    fn from(item: &SaleItem) -> Self {
        LineItem::new(item.product_id, item.quantity, item.unit_price)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    #[serde(flatten)]
    pub header: Sale,
    pub customer_name: String,
    pub items: Vec<SaleItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_amount() {
        let items = vec![
            LineItem::new(Uuid::new_v4(), 2, Decimal::new(1000, 2)), // 2 x 10.00
            LineItem::new(Uuid::new_v4(), 1, Decimal::new(550, 2)),  // 1 x 5.50
        ];
        assert_eq!(total_amount(&items), Decimal::new(2550, 2)); // 25.50
    }

    #[test]
    fn test_total_amount_empty() {
        assert_eq!(total_amount(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_amount_receivable_pending() {
        let total = Decimal::new(10000, 2); // 100.00
        assert_eq!(
            amount_receivable(SaleStatus::Pending, total, Decimal::ZERO),
            total
        );
        assert_eq!(
            amount_receivable(SaleStatus::Pending, total, Decimal::new(2500, 2)),
            Decimal::new(7500, 2)
        );
    }

    #[test]
    fn test_amount_receivable_paid_is_zero() {
        assert_eq!(
            amount_receivable(SaleStatus::Paid, Decimal::new(10000, 2), Decimal::ZERO),
            Decimal::ZERO
        );
    }
}
