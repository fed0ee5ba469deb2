// src/services/budget_service.rs

use chrono::NaiveDate;
use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BudgetRepository, CustomerRepository, ProductRepository},
    models::{
        budget::{Budget, BudgetDetail, BudgetStatus},
        sale::{total_amount, LineItem, Sale},
    },
    services::{conversion_service::ConversionService, stock},
};

#[derive(Clone)]
pub struct BudgetService {
    budget_repo: BudgetRepository,
    customer_repo: CustomerRepository,
    product_repo: ProductRepository,
    conversion_service: ConversionService,
}

impl BudgetService {
    pub fn new(
        budget_repo: BudgetRepository,
        customer_repo: CustomerRepository,
        product_repo: ProductRepository,
        conversion_service: ConversionService,
    ) -> Self {
        Self {
            budget_repo,
            customer_repo,
            product_repo,
            conversion_service,
        }
    }

    pub async fn list(&self, status: Option<BudgetStatus>) -> Result<Vec<Budget>, AppError> {
        self.budget_repo.get_all(status).await
    }

    pub async fn get_detail<'e, E>(&self, executor: E, id: Uuid) -> Result<BudgetDetail, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let budget = self
            .budget_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::BudgetNotFound(id))?;
        let customer = self
            .customer_repo
            .find_by_id(&mut *tx, budget.customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound(budget.customer_id))?;
        let items = self.budget_repo.list_items(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(BudgetDetail { header: budget, customer_name: customer.name, items })
    }

    /// Cria um orçamento PENDING. Não reserva nem valida estoque — isso é
    /// assunto da conversão — mas todo produto referenciado precisa existir
    /// e o preço unitário é congelado aqui.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        items: &[LineItem],
        budget_date: NaiveDate,
        valid_until: NaiveDate,
        notes: Option<&str>,
    ) -> Result<BudgetDetail, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let customer = self
            .customer_repo
            .find_by_id(&mut *tx, customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound(customer_id))?;

        let ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let products = self.product_repo.find_by_ids(&mut *tx, &ids).await?;
        stock::ensure_products_exist(&stock::snapshot_from_products(&products), items)?;

        let budget = self
            .budget_repo
            .insert(&mut *tx, customer_id, total_amount(items), budget_date, valid_until, notes)
            .await?;

        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            rows.push(self.budget_repo.insert_item(&mut *tx, budget.id, item).await?);
        }

        tx.commit().await?;
        Ok(BudgetDetail { header: budget, customer_name: customer.name, items: rows })
    }

    /// Edita um orçamento. Só PENDING é editável; APPROVED e REJECTED são
    /// imutáveis pela API.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        customer_id: Uuid,
        items: &[LineItem],
        budget_date: NaiveDate,
        valid_until: NaiveDate,
        notes: Option<&str>,
    ) -> Result<BudgetDetail, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let budget = self
            .budget_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::BudgetNotFound(id))?;
        if budget.status != BudgetStatus::Pending {
            return Err(AppError::BudgetNotPending);
        }

        let customer = self
            .customer_repo
            .find_by_id(&mut *tx, customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound(customer_id))?;

        let ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let products = self.product_repo.find_by_ids(&mut *tx, &ids).await?;
        stock::ensure_products_exist(&stock::snapshot_from_products(&products), items)?;

        let budget = self
            .budget_repo
            .update_header(&mut *tx, id, customer_id, total_amount(items), budget_date, valid_until, notes)
            .await?;

        self.budget_repo.delete_items(&mut *tx, id).await?;
        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            rows.push(self.budget_repo.insert_item(&mut *tx, id, item).await?);
        }

        tx.commit().await?;
        Ok(BudgetDetail { header: budget, customer_name: customer.name, items: rows })
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let budget = self
            .budget_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::BudgetNotFound(id))?;
        if budget.status != BudgetStatus::Pending {
            return Err(AppError::BudgetNotPending);
        }

        self.budget_repo.delete(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Aprovar = converter. O motor de conversão faz débitos, venda e a
    /// mudança para APPROVED numa única transação.
    pub async fn approve<'e, E>(&self, executor: E, id: Uuid) -> Result<Sale, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        self.conversion_service.convert_budget(executor, id).await
    }

    /// Rejeição é terminal e sem efeitos colaterais: nenhum estoque se move,
    /// nenhuma venda nasce, e a varredura nunca mais enxerga este orçamento.
    pub async fn reject<'e, E>(&self, executor: E, id: Uuid) -> Result<Budget, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let budget = self
            .budget_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::BudgetNotFound(id))?;

        let budget = match budget.status {
            BudgetStatus::Pending => {
                self.budget_repo.update_status(&mut *tx, id, BudgetStatus::Rejected).await?
            }
            // Rejeitar de novo é inofensivo.
            BudgetStatus::Rejected => budget,
            BudgetStatus::Approved => return Err(AppError::BudgetNotPending),
        };

        tx.commit().await?;
        Ok(budget)
    }
}
