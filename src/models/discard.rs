// src/models/discard.rs

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

// Baixa de estoque por perda/avaria. Criar um descarte debita o saldo do
// produto; excluir o registro devolve o saldo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Discard {
    pub id: Uuid,
    pub product_id: Uuid,

    #[schema(example = 3)]
    pub quantity: i32,

    #[schema(example = "Embalagem violada")]
    pub reason: String,

    #[schema(value_type = String, format = Date, example = "2026-08-05")]
    pub discard_date: NaiveDate,

    pub created_at: DateTime<Utc>,
}
