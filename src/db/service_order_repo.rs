// src/db/service_order_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::{
        sale::LineItem,
        service_order::{ServiceOrder, ServiceOrderItem, ServiceOrderStatus},
    },
};

#[derive(Clone)]
pub struct ServiceOrderRepository {
    pool: PgPool,
}

impl ServiceOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn get_all(&self) -> Result<Vec<ServiceOrder>, AppError> {
        let orders = sqlx::query_as::<_, ServiceOrder>(
            "SELECT * FROM service_orders ORDER BY entry_date DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<ServiceOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, ServiceOrder>(
            "SELECT * FROM service_orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        service_order_id: Uuid,
    ) -> Result<Vec<ServiceOrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, ServiceOrderItem>(
            "SELECT * FROM service_order_items WHERE service_order_id = $1",
        )
        .bind(service_order_id)
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
        description: Option<&str>,
        total_amount: Decimal,
        entry_date: DateTime<Utc>,
    ) -> Result<ServiceOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, ServiceOrder>(
            r#"
            INSERT INTO service_orders (customer_id, description, total_amount, entry_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(description)
        .bind(total_amount)
        .bind(entry_date)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        service_order_id: Uuid,
        item: &LineItem,
    ) -> Result<ServiceOrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, ServiceOrderItem>(
            r#"
            INSERT INTO service_order_items (service_order_id, product_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(service_order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    /// Reescreve o cabeçalho após edição dos itens (descrição + novo total).
    pub async fn update_header<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        description: Option<&str>,
        total_amount: Decimal,
    ) -> Result<ServiceOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, ServiceOrder>(
            r#"
            UPDATE service_orders
            SET description = $2, total_amount = $3, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(description)
        .bind(total_amount)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: ServiceOrderStatus,
        exit_date: Option<DateTime<Utc>>,
    ) -> Result<ServiceOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, ServiceOrder>(
            r#"
            UPDATE service_orders
            SET status = $2, exit_date = COALESCE($3, exit_date), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(exit_date)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn delete_items<'e, E>(
        &self,
        executor: E,
        service_order_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM service_order_items WHERE service_order_id = $1")
            .bind(service_order_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM service_orders WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
