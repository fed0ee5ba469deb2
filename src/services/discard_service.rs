// src/services/discard_service.rs

use chrono::NaiveDate;
use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DiscardRepository, ProductRepository},
    models::discard::Discard,
};

#[derive(Clone)]
pub struct DiscardService {
    discard_repo: DiscardRepository,
    product_repo: ProductRepository,
}

impl DiscardService {
    pub fn new(discard_repo: DiscardRepository, product_repo: ProductRepository) -> Self {
        Self { discard_repo, product_repo }
    }

    pub async fn list(&self) -> Result<Vec<Discard>, AppError> {
        self.discard_repo.get_all().await
    }

    /// Registra a perda e debita o saldo na mesma transação. O decremento é
    /// condicional: não dá para descartar mais do que existe.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        quantity: i32,
        reason: &str,
        discard_date: NaiveDate,
    ) -> Result<Discard, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let product = self
            .product_repo
            .find_by_id(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound(product_id))?;

        if !product.tracks_stock() {
            let mut errors = validator::ValidationErrors::new();
            let mut err = validator::ValidationError::new("kind");
            err.message = Some("Produtos do tipo serviço não podem ser descartados.".into());
            errors.add("productId", err);
            return Err(AppError::ValidationError(errors));
        }

        let ok = self.product_repo.try_decrement_stock(&mut *tx, product_id, quantity).await?;
        if !ok {
            return Err(AppError::StockInsufficient {
                product_id,
                product_name: product.name,
                available: product.quantity.unwrap_or(0),
                requested: quantity,
            });
        }

        let discard = self
            .discard_repo
            .insert(&mut *tx, product_id, quantity, reason, discard_date)
            .await?;

        tx.commit().await?;
        Ok(discard)
    }

    /// Desfaz um descarte devolvendo o saldo ao produto.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let discard = self
            .discard_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::DiscardNotFound(id))?;

        self.product_repo
            .increment_stock(&mut *tx, discard.product_id, discard.quantity)
            .await?;
        self.discard_repo.delete(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(())
    }
}
