// src/db/budget_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::{
        budget::{Budget, BudgetItem, BudgetStatus},
        sale::LineItem,
    },
};

#[derive(Clone)]
pub struct BudgetRepository {
    pool: PgPool,
}

impl BudgetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn get_all(&self, status: Option<BudgetStatus>) -> Result<Vec<Budget>, AppError> {
        let budgets = match status {
            Some(status) => {
                sqlx::query_as::<_, Budget>(
                    "SELECT * FROM budgets WHERE status = $1 ORDER BY budget_date DESC, created_at DESC",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Budget>(
                    "SELECT * FROM budgets ORDER BY budget_date DESC, created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(budgets)
    }

    /// Todos os orçamentos APPROVED, na ordem de aprovação.
    /// A varredura de reconciliação parte desta lista.
    pub async fn find_approved<'e, E>(&self, executor: E) -> Result<Vec<Budget>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let budgets = sqlx::query_as::<_, Budget>(
            "SELECT * FROM budgets WHERE status = 'APPROVED' ORDER BY updated_at ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(budgets)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Budget>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let budget = sqlx::query_as::<_, Budget>("SELECT * FROM budgets WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(budget)
    }

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        budget_id: Uuid,
    ) -> Result<Vec<BudgetItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, BudgetItem>(
            "SELECT * FROM budget_items WHERE budget_id = $1",
        )
        .bind(budget_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    // ---
    // Escritas (transacionais)
    // ---

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        total_amount: Decimal,
        budget_date: NaiveDate,
        valid_until: NaiveDate,
        notes: Option<&str>,
    ) -> Result<Budget, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            INSERT INTO budgets (customer_id, total_amount, budget_date, valid_until, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(total_amount)
        .bind(budget_date)
        .bind(valid_until)
        .bind(notes)
        .fetch_one(executor)
        .await?;
        Ok(budget)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        budget_id: Uuid,
        item: &LineItem,
    ) -> Result<BudgetItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, BudgetItem>(
            r#"
            INSERT INTO budget_items (budget_id, product_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(budget_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn update_header<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        customer_id: Uuid,
        total_amount: Decimal,
        budget_date: NaiveDate,
        valid_until: NaiveDate,
        notes: Option<&str>,
    ) -> Result<Budget, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            UPDATE budgets
            SET customer_id = $2, total_amount = $3, budget_date = $4,
                valid_until = $5, notes = $6, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(customer_id)
        .bind(total_amount)
        .bind(budget_date)
        .bind(valid_until)
        .bind(notes)
        .fetch_one(executor)
        .await?;
        Ok(budget)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: BudgetStatus,
    ) -> Result<Budget, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let budget = sqlx::query_as::<_, Budget>(
            "UPDATE budgets SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(budget)
    }

    pub async fn delete_items<'e, E>(&self, executor: E, budget_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM budget_items WHERE budget_id = $1")
            .bind(budget_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM budgets WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
