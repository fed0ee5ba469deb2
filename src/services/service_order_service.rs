// src/services/service_order_service.rs

use chrono::Utc;
use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, ProductRepository, ServiceOrderRepository},
    models::{
        sale::{total_amount, LineItem},
        service_order::{ServiceOrder, ServiceOrderDetail, ServiceOrderStatus},
    },
    services::stock,
};

#[derive(Clone)]
pub struct ServiceOrderService {
    order_repo: ServiceOrderRepository,
    customer_repo: CustomerRepository,
    product_repo: ProductRepository,
}

impl ServiceOrderService {
    pub fn new(
        order_repo: ServiceOrderRepository,
        customer_repo: CustomerRepository,
        product_repo: ProductRepository,
    ) -> Self {
        Self { order_repo, customer_repo, product_repo }
    }

    /// Abre uma OS debitando o estoque dos itens PIECE, como numa venda:
    /// leitura fresca, validação all-or-nothing e decremento condicional na
    /// mesma transação que cria a ordem.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        description: Option<&str>,
        items: &[LineItem],
    ) -> Result<ServiceOrderDetail, AppError>
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
        let snapshot = stock::snapshot_from_products(&products);
        let decrements = stock::plan_decrements(&snapshot, items)?;
        stock::apply_decrements(&self.product_repo, &mut tx, &decrements).await?;

        let order = self
            .order_repo
            .insert(&mut *tx, customer_id, description, total_amount(items), Utc::now())
            .await?;

        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            rows.push(self.order_repo.insert_item(&mut *tx, order.id, item).await?);
        }

        tx.commit().await?;
        Ok(ServiceOrderDetail { header: order, customer_name: customer.name, items: rows })
    }

    pub async fn list(&self) -> Result<Vec<ServiceOrder>, AppError> {
        self.order_repo.get_all().await
    }

    pub async fn get_detail<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<ServiceOrderDetail, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self
            .order_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::ServiceOrderNotFound(id))?;
        let customer = self
            .customer_repo
            .find_by_id(&mut *tx, order.customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound(order.customer_id))?;
        let items = self.order_repo.list_items(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(ServiceOrderDetail { header: order, customer_name: customer.name, items })
    }

    /// Edição de itens com reconciliação incremental de estoque: devolve as
    /// quantidades antigas e debita as novas pelo delta líquido por produto.
    /// Reduzir o consumo de um produto nunca é rejeitado por falta de saldo,
    /// porque o disponível para a nova alocação inclui o que está sendo
    /// devolvido.
    pub async fn update_items<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        description: Option<&str>,
        new_items: &[LineItem],
    ) -> Result<ServiceOrderDetail, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self
            .order_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::ServiceOrderNotFound(id))?;
        let customer = self
            .customer_repo
            .find_by_id(&mut *tx, order.customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound(order.customer_id))?;

        let old_items: Vec<LineItem> = self
            .order_repo
            .list_items(&mut *tx, id)
            .await?
            .iter()
            .map(LineItem::from)
            .collect();

        let deltas = stock::net_deltas(&old_items, new_items);
        stock::apply_deltas(&self.product_repo, &mut tx, &deltas).await?;

        self.order_repo.delete_items(&mut *tx, id).await?;
        let mut rows = Vec::with_capacity(new_items.len());
        for item in new_items {
            rows.push(self.order_repo.insert_item(&mut *tx, id, item).await?);
        }

        let order = self
            .order_repo
            .update_header(&mut *tx, id, description, total_amount(new_items))
            .await?;

        tx.commit().await?;
        Ok(ServiceOrderDetail { header: order, customer_name: customer.name, items: rows })
    }

    /// O fluxo de status só anda para frente; DELIVERED carimba a data de saída.
    pub async fn transition<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        next: ServiceOrderStatus,
    ) -> Result<ServiceOrder, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self
            .order_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::ServiceOrderNotFound(id))?;

        if !order.status.can_transition_to(next) {
            return Err(AppError::InvalidStatusTransition);
        }

        let exit_date = match next {
            ServiceOrderStatus::Delivered => Some(Utc::now()),
            _ => None,
        };

        let order = self.order_repo.update_status(&mut *tx, id, next, exit_date).await?;
        tx.commit().await?;
        Ok(order)
    }

    /// Exclui a OS devolvendo o estoque consumido pelos itens.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.order_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::ServiceOrderNotFound(id))?;

        let items: Vec<LineItem> = self
            .order_repo
            .list_items(&mut *tx, id)
            .await?
            .iter()
            .map(LineItem::from)
            .collect();

        stock::restore_items(&self.product_repo, &mut tx, &items).await?;
        self.order_repo.delete(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(())
    }
}
