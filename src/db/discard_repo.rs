// src/db/discard_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{common::error::AppError, models::discard::Discard};

#[derive(Clone)]
pub struct DiscardRepository {
    pool: PgPool,
}

impl DiscardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> Result<Vec<Discard>, AppError> {
        let discards = sqlx::query_as::<_, Discard>(
            "SELECT * FROM discards ORDER BY discard_date DESC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(discards)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Discard>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let discard = sqlx::query_as::<_, Discard>("SELECT * FROM discards WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(discard)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        quantity: i32,
        reason: &str,
        discard_date: NaiveDate,
    ) -> Result<Discard, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let discard = sqlx::query_as::<_, Discard>(
            r#"
            INSERT INTO discards (product_id, quantity, reason, discard_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(reason)
        .bind(discard_date)
        .fetch_one(executor)
        .await?;
        Ok(discard)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM discards WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
