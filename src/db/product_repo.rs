// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::product::{Product, ProductKind},
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn get_all(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    /// Produtos PIECE cujo saldo está no limiar de alerta ou abaixo dele.
    pub async fn get_low_stock(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE kind = 'PIECE'
              AND low_stock_threshold IS NOT NULL
              AND quantity <= low_stock_threshold
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Leitura fresca dos produtos referenciados pelos itens de linha.
    /// A conversão SEMPRE valida contra esta leitura, nunca contra uma
    /// lista vinda do chamador.
    pub async fn find_by_ids<'e, E>(
        &self,
        executor: E,
        ids: &[Uuid],
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    // ---
    // Escritas
    // ---

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        description: Option<&str>,
        kind: ProductKind,
        price: Decimal,
        cost: Decimal,
        quantity: Option<i32>,
        low_stock_threshold: Option<i32>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, kind, price, cost, quantity, low_stock_threshold)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(kind)
        .bind(price)
        .bind(cost)
        .bind(quantity)
        .bind(low_stock_threshold)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    /// Atualiza o cadastro do produto. O saldo (quantity) não passa por aqui:
    /// estoque só muda via entrada, conversão, descarte ou restauração.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        cost: Decimal,
        low_stock_threshold: Option<i32>,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, cost = $5,
                low_stock_threshold = $6, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(cost)
        .bind(low_stock_threshold)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Primitivas de estoque
    // ---

    /// Decremento condicional: só debita se o saldo atual comporta o pedido.
    /// Retorna `false` quando a condição falha (zero linhas afetadas) e o
    /// chamador converte isso em StockInsufficient, derrubando a transação.
    /// É isto que impede duas vendas concorrentes de deixarem o saldo negativo.
    pub async fn try_decrement_stock<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity - $2, updated_at = now()
            WHERE id = $1 AND kind = 'PIECE' AND quantity >= $2
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Devolve saldo ao estoque (exclusão de venda, edição de OS, restauração).
    pub async fn increment_stock<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity + $2, updated_at = now()
            WHERE id = $1 AND kind = 'PIECE'
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .execute(executor)
        .await?;
        Ok(())
    }
}
