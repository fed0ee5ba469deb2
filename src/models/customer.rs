// src/models/customer.rs

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Maria da Silva")]
    pub name: String,

    #[schema(example = "maria@exemplo.com")]
    pub email: Option<String>,

    #[schema(example = "(11) 99999-0000")]
    pub phone: Option<String>,

    // CPF ou CNPJ
    #[schema(example = "123.456.789-00")]
    pub document: Option<String>,

    pub address: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
