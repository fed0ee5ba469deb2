// src/services/sale_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, ProductRepository, SaleRepository},
    models::sale::{LineItem, PaymentMethod, Sale, SaleDetail, SaleStatus},
    services::{conversion_service::ConversionService, stock},
};

#[derive(Clone)]
pub struct SaleService {
    sale_repo: SaleRepository,
    customer_repo: CustomerRepository,
    product_repo: ProductRepository,
    conversion_service: ConversionService,
}

impl SaleService {
    pub fn new(
        sale_repo: SaleRepository,
        customer_repo: CustomerRepository,
        product_repo: ProductRepository,
        conversion_service: ConversionService,
    ) -> Self {
        Self {
            sale_repo,
            customer_repo,
            product_repo,
            conversion_service,
        }
    }

    /// Venda direta: o motor de conversão valida e debita o estoque na mesma
    /// transação que cria a venda.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        items: &[LineItem],
        payment_method: PaymentMethod,
        status: SaleStatus,
        down_payment: Decimal,
    ) -> Result<Sale, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        self.conversion_service
            .create_sale(executor, customer_id, items, payment_method, status, down_payment)
            .await
    }

    pub async fn list(&self) -> Result<Vec<Sale>, AppError> {
        self.sale_repo.get_all().await
    }

    pub async fn get_detail<'e, E>(&self, executor: E, id: Uuid) -> Result<SaleDetail, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let sale = self
            .sale_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::SaleNotFound(id))?;
        let customer = self
            .customer_repo
            .find_by_id(&mut *tx, sale.customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound(sale.customer_id))?;
        let items = self.sale_repo.list_items(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(SaleDetail { header: sale, customer_name: customer.name, items })
    }

    /// Quita a venda (status PAID, saldo a receber zerado).
    pub async fn settle<'e, E>(&self, executor: E, id: Uuid) -> Result<Sale, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let sale = self
            .sale_repo
            .settle(&mut *tx, id)
            .await?
            .ok_or(AppError::SaleNotFound(id))?;
        tx.commit().await?;
        Ok(sale)
    }

    /// Exclui a venda devolvendo ao estoque as quantidades dos itens PIECE.
    /// Tudo na mesma transação: ou a venda some e o saldo volta, ou nada.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.sale_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::SaleNotFound(id))?;

        let items: Vec<LineItem> = self
            .sale_repo
            .list_items(&mut *tx, id)
            .await?
            .iter()
            .map(LineItem::from)
            .collect();

        stock::restore_items(&self.product_repo, &mut tx, &items).await?;
        self.sale_repo.delete(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(())
    }
}
