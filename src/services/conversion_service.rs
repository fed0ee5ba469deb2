// src/services/conversion_service.rs
//
// Motor de conversão: transforma itens de linha em débitos de estoque + uma
// venda, numa ÚNICA transação. É o mesmo miolo para os três caminhos:
// venda direta, aprovação de orçamento e reconversão pela varredura.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Acquire, PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BudgetRepository, CustomerRepository, ProductRepository, SaleRepository},
    models::{
        budget::{Budget, BudgetStatus},
        sale::{amount_receivable, total_amount, LineItem, PaymentMethod, Sale, SaleStatus},
    },
    services::stock::{self, StockDecrement},
};

#[derive(Clone)]
pub struct ConversionService {
    product_repo: ProductRepository,
    sale_repo: SaleRepository,
    budget_repo: BudgetRepository,
    customer_repo: CustomerRepository,
}

impl ConversionService {
    pub fn new(
        product_repo: ProductRepository,
        sale_repo: SaleRepository,
        budget_repo: BudgetRepository,
        customer_repo: CustomerRepository,
    ) -> Self {
        Self {
            product_repo,
            sale_repo,
            budget_repo,
            customer_repo,
        }
    }

    /// Venda direta (sem orçamento de origem).
    #[allow(clippy::too_many_arguments)]
    pub async fn create_sale<'e, E>(
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
        let mut tx = executor.begin().await?;

        let (sale, _) = self
            .convert_within(&mut tx, customer_id, None, items, payment_method, status, down_payment)
            .await?;

        tx.commit().await?;
        Ok(sale)
    }

    /// Aprova um orçamento PENDING convertendo-o em venda. Débitos de
    /// estoque, criação da venda e a mudança de status para APPROVED
    /// acontecem na mesma transação: ou tudo entra, ou nada entra.
    pub async fn convert_budget<'e, E>(&self, executor: E, budget_id: Uuid) -> Result<Sale, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let budget = self
            .budget_repo
            .find_by_id(&mut *tx, budget_id)
            .await?
            .ok_or(AppError::BudgetNotFound(budget_id))?;

        match budget.status {
            BudgetStatus::Pending => {}
            BudgetStatus::Rejected => return Err(AppError::BudgetRejected),
            // Orçamento já aprovado é assunto da varredura, não do caminho direto.
            BudgetStatus::Approved => return Err(AppError::BudgetAlreadyConverted),
        }

        let items: Vec<LineItem> = self
            .budget_repo
            .list_items(&mut *tx, budget_id)
            .await?
            .iter()
            .map(LineItem::from)
            .collect();

        let (sale, _) = self
            .convert_within(
                &mut tx,
                budget.customer_id,
                Some(budget_id),
                &items,
                PaymentMethod::Cash,
                SaleStatus::Pending,
                Decimal::ZERO,
            )
            .await?;

        self.budget_repo
            .update_status(&mut *tx, budget_id, BudgetStatus::Approved)
            .await?;

        tx.commit().await?;
        Ok(sale)
    }

    /// Reconversão usada pela varredura: o orçamento JÁ está APPROVED e só
    /// falta a venda. Mesmo miolo, transação própria, sem nova mudança de
    /// status. Devolve os débitos aplicados para o snapshot do passe.
    pub async fn convert_for_sync<'e, E>(
        &self,
        executor: E,
        budget: &Budget,
        items: &[LineItem],
    ) -> Result<(Sale, Vec<StockDecrement>), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let (sale, decrements) = self
            .convert_within(
                &mut tx,
                budget.customer_id,
                Some(budget.id),
                items,
                PaymentMethod::Cash,
                SaleStatus::Pending,
                Decimal::ZERO,
            )
            .await?;

        tx.commit().await?;
        Ok((sale, decrements))
    }

    /// O miolo: leitura fresca → validação all-or-nothing → decrementos
    /// condicionais → insert da venda com preços congelados dos itens.
    /// Roda sempre dentro da transação do chamador.
    #[allow(clippy::too_many_arguments)]
    async fn convert_within(
        &self,
        conn: &mut PgConnection,
        customer_id: Uuid,
        budget_id: Option<Uuid>,
        items: &[LineItem],
        payment_method: PaymentMethod,
        status: SaleStatus,
        down_payment: Decimal,
    ) -> Result<(Sale, Vec<StockDecrement>), AppError> {
        require_items(items)?;

        self.customer_repo
            .find_by_id(&mut *conn, customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound(customer_id))?;

        // 1. Leitura fresca das quantidades, dentro da transação.
        let ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let products = self.product_repo.find_by_ids(&mut *conn, &ids).await?;
        let snapshot = stock::snapshot_from_products(&products);

        // 2/3. Valida tudo e monta os débitos. Nenhuma escrita antes daqui.
        let decrements = stock::plan_decrements(&snapshot, items)?;

        // 4. Decremento condicional: uma corrida perdida desde a leitura vira
        //    StockInsufficient e derruba a transação inteira.
        stock::apply_decrements(&self.product_repo, &mut *conn, &decrements).await?;

        // 5. A venda em si. Id novo (uuid v4), total congelado a partir dos
        //    preços unitários dos itens.
        let total = total_amount(items);
        let sale = self
            .sale_repo
            .insert(
                &mut *conn,
                Uuid::new_v4(),
                customer_id,
                budget_id,
                status,
                payment_method,
                total,
                down_payment,
                amount_receivable(status, total, down_payment),
                Utc::now(),
            )
            .await?;

        for item in items {
            self.sale_repo.insert_item(&mut *conn, sale.id, item).await?;
        }

        Ok((sale, decrements))
    }
}

fn require_items(items: &[LineItem]) -> Result<(), AppError> {
    if items.is_empty() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new("length");
        err.message = Some("A lista de itens não pode ser vazia.".into());
        errors.add("items", err);
        return Err(AppError::ValidationError(errors));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_items_rejects_empty() {
        assert!(matches!(
            require_items(&[]),
            Err(AppError::ValidationError(_))
        ));
        let item = LineItem::new(Uuid::new_v4(), 1, Decimal::new(100, 2));
        assert!(require_items(&[item]).is_ok());
    }
}
