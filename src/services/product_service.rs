// src/services/product_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::product::{Product, ProductKind},
};

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
}

impl ProductService {
    pub fn new(product_repo: ProductRepository) -> Self {
        Self { product_repo }
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        self.product_repo.get_all().await
    }

    pub async fn list_low_stock(&self) -> Result<Vec<Product>, AppError> {
        self.product_repo.get_low_stock().await
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<Product, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        self.product_repo
            .find_by_id(&mut *conn, id)
            .await?
            .ok_or(AppError::ProductNotFound(id))
    }

    /// PIECE nasce com saldo (ausente = 0); SERVICE nunca carrega saldo,
    /// venha o que vier no payload.
    #[allow(clippy::too_many_arguments)]
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
        E: Acquire<'e, Database = Postgres>,
    {
        let (quantity, threshold) = match kind {
            ProductKind::Piece => (Some(quantity.unwrap_or(0)), low_stock_threshold),
            ProductKind::Service => (None, None),
        };

        let mut conn = executor.acquire().await?;
        self.product_repo
            .create(&mut *conn, name, description, kind, price, cost, quantity, threshold)
            .await
    }

    /// Atualiza o cadastro. Mudar o preço aqui NÃO reescreve itens de linha
    /// históricos: orçamentos, vendas e OS guardam o preço congelado.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        cost: Decimal,
        low_stock_threshold: Option<i32>,
    ) -> Result<Product, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        self.product_repo
            .update(&mut *conn, id, name, description, price, cost, low_stock_threshold)
            .await?
            .ok_or(AppError::ProductNotFound(id))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        let deleted = self.product_repo.delete(&mut *conn, id).await?;
        if !deleted {
            return Err(AppError::ProductNotFound(id));
        }
        Ok(())
    }

    /// Entrada de estoque (compra, ajuste). Só PIECE tem saldo para receber.
    pub async fn add_stock<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        quantity: i32,
    ) -> Result<Product, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let product = self
            .product_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::ProductNotFound(id))?;

        if !product.tracks_stock() {
            let mut errors = validator::ValidationErrors::new();
            let mut err = validator::ValidationError::new("kind");
            err.message = Some("Produtos do tipo serviço não têm estoque.".into());
            errors.add("productId", err);
            return Err(AppError::ValidationError(errors));
        }

        self.product_repo.increment_stock(&mut *tx, id, quantity).await?;
        let product = self
            .product_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::ProductNotFound(id))?;

        tx.commit().await?;
        Ok(product)
    }
}
