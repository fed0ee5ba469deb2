// src/db/sale_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::sale::{LineItem, PaymentMethod, Sale, SaleItem, SaleStatus},
};

#[derive(Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn get_all(&self) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales ORDER BY sale_date DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(sale)
    }

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
    ) -> Result<Vec<SaleItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, SaleItem>(
            "SELECT * FROM sale_items WHERE sale_id = $1",
        )
        .bind(sale_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    /// Conjunto de orçamentos já "reivindicados" por alguma venda.
    /// A varredura subtrai este conjunto dos orçamentos APPROVED.
    pub async fn claimed_budget_ids<'e, E>(&self, executor: E) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT budget_id FROM sales WHERE budget_id IS NOT NULL",
        )
        .fetch_all(executor)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    // ---
    // Escritas (transacionais)
    // ---

    /// Insere a venda com id gerado pelo chamador (uuid v4).
    /// O índice único parcial em budget_id garante que um orçamento não pode
    /// ser reivindicado duas vezes, mesmo entre processos concorrentes.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        customer_id: Uuid,
        budget_id: Option<Uuid>,
        status: SaleStatus,
        payment_method: PaymentMethod,
        total_amount: Decimal,
        down_payment: Decimal,
        amount_receivable: Decimal,
        sale_date: DateTime<Utc>,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (id, customer_id, budget_id, status, payment_method,
                               total_amount, down_payment, amount_receivable, sale_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(customer_id)
        .bind(budget_id)
        .bind(status)
        .bind(payment_method)
        .bind(total_amount)
        .bind(down_payment)
        .bind(amount_receivable)
        .bind(sale_date)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::BudgetAlreadyConverted;
                }
            }
            e.into()
        })
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
        item: &LineItem,
    ) -> Result<SaleItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (sale_id, product_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(sale_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    /// Quita a venda: status PAID e saldo a receber zerado.
    pub async fn settle<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales
            SET status = 'PAID', amount_receivable = 0, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(sale)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
