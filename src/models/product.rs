// src/models/product.rs

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

// --- Tipo do Produto ---
// PIECE tem estoque finito (coluna quantity). SERVICE não baixa estoque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_kind", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum ProductKind {
    Piece,
    Service,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Filtro de óleo")]
    pub name: String,

    pub description: Option<String>,

    pub kind: ProductKind,

    // Preço de venda
    #[schema(example = "49.90")]
    pub price: Decimal,

    // Custo de aquisição
    #[schema(example = "22.00")]
    pub cost: Decimal,

    // Saldo em estoque. Sempre presente para PIECE, sempre None para SERVICE.
    #[schema(example = 12)]
    pub quantity: Option<i32>,

    #[schema(example = 5)]
    pub low_stock_threshold: Option<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Produtos do tipo SERVICE não participam de validação de estoque.
    pub fn tracks_stock(&self) -> bool {
        self.kind == ProductKind::Piece
    }
}
