// src/services/backup_service.rs
//
// Exporta todas as coleções num único JSON (chaves de topo = coleções,
// documentos com "_id") e restaura a partir dele. A restauração substitui o
// banco inteiro numa única transação: ou o backup entra completo, ou nada.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        backup::{
            BackupFile, BackupLineItem, BudgetDoc, CustomerDoc, DiscardDoc, ProductDoc, SaleDoc,
            ServiceOrderDoc,
        },
        budget::{Budget, BudgetItem},
        customer::Customer,
        discard::Discard,
        product::Product,
        sale::{Sale, SaleItem},
        service_order::{ServiceOrder, ServiceOrderItem},
    },
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestoreReport {
    pub customers: u32,
    pub products: u32,
    pub budgets: u32,
    pub sales: u32,
    pub service_orders: u32,
    pub discards: u32,
}

#[derive(Clone)]
pub struct BackupService;

impl BackupService {
    pub fn new() -> Self {
        Self
    }

    pub async fn export(&self, pool: &PgPool) -> Result<BackupFile, AppError> {
        // Transação só de leitura, para um retrato consistente.
        let mut tx = pool.begin().await?;

        let customers = sqlx::query_as::<_, Customer>("SELECT * FROM customers")
            .fetch_all(&mut *tx)
            .await?;
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products")
            .fetch_all(&mut *tx)
            .await?;
        let budgets = sqlx::query_as::<_, Budget>("SELECT * FROM budgets")
            .fetch_all(&mut *tx)
            .await?;
        let budget_items = sqlx::query_as::<_, BudgetItem>("SELECT * FROM budget_items")
            .fetch_all(&mut *tx)
            .await?;
        let sales = sqlx::query_as::<_, Sale>("SELECT * FROM sales")
            .fetch_all(&mut *tx)
            .await?;
        let sale_items = sqlx::query_as::<_, SaleItem>("SELECT * FROM sale_items")
            .fetch_all(&mut *tx)
            .await?;
        let orders = sqlx::query_as::<_, ServiceOrder>("SELECT * FROM service_orders")
            .fetch_all(&mut *tx)
            .await?;
        let order_items =
            sqlx::query_as::<_, ServiceOrderItem>("SELECT * FROM service_order_items")
                .fetch_all(&mut *tx)
                .await?;
        let discards = sqlx::query_as::<_, Discard>("SELECT * FROM discards")
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let mut items_by_budget: HashMap<Uuid, Vec<BackupLineItem>> = HashMap::new();
        for item in budget_items {
            items_by_budget.entry(item.budget_id).or_default().push(BackupLineItem {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
            });
        }
        let mut items_by_sale: HashMap<Uuid, Vec<BackupLineItem>> = HashMap::new();
        for item in sale_items {
            items_by_sale.entry(item.sale_id).or_default().push(BackupLineItem {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
            });
        }
        let mut items_by_order: HashMap<Uuid, Vec<BackupLineItem>> = HashMap::new();
        for item in order_items {
            items_by_order.entry(item.service_order_id).or_default().push(BackupLineItem {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
            });
        }

        Ok(BackupFile {
            customers: customers
                .into_iter()
                .map(|c| CustomerDoc {
                    id: c.id,
                    name: c.name,
                    email: c.email,
                    phone: c.phone,
                    document: c.document,
                    address: c.address,
                    created_at: c.created_at,
                })
                .collect(),
            products: products
                .into_iter()
                .map(|p| ProductDoc {
                    id: p.id,
                    name: p.name,
                    description: p.description,
                    kind: p.kind,
                    price: p.price,
                    cost: p.cost,
                    quantity: p.quantity,
                    low_stock_threshold: p.low_stock_threshold,
                    created_at: p.created_at,
                })
                .collect(),
            budgets: budgets
                .into_iter()
                .map(|b| BudgetDoc {
                    id: b.id,
                    customer_id: b.customer_id,
                    status: b.status,
                    total_amount: b.total_amount,
                    budget_date: b.budget_date,
                    valid_until: b.valid_until,
                    notes: b.notes,
                    items: items_by_budget.remove(&b.id).unwrap_or_default(),
                    created_at: b.created_at,
                })
                .collect(),
            sales: sales
                .into_iter()
                .map(|s| SaleDoc {
                    id: s.id,
                    customer_id: s.customer_id,
                    budget_id: s.budget_id,
                    status: s.status,
                    payment_method: s.payment_method,
                    total_amount: s.total_amount,
                    down_payment: s.down_payment,
                    amount_receivable: s.amount_receivable,
                    sale_date: s.sale_date,
                    items: items_by_sale.remove(&s.id).unwrap_or_default(),
                    created_at: s.created_at,
                })
                .collect(),
            service_orders: orders
                .into_iter()
                .map(|o| ServiceOrderDoc {
                    id: o.id,
                    customer_id: o.customer_id,
                    description: o.description,
                    status: o.status,
                    total_amount: o.total_amount,
                    entry_date: o.entry_date,
                    exit_date: o.exit_date,
                    items: items_by_order.remove(&o.id).unwrap_or_default(),
                    created_at: o.created_at,
                })
                .collect(),
            discards: discards
                .into_iter()
                .map(|d| DiscardDoc {
                    id: d.id,
                    product_id: d.product_id,
                    quantity: d.quantity,
                    reason: d.reason,
                    discard_date: d.discard_date,
                    created_at: d.created_at,
                })
                .collect(),
        })
    }

    /// Substitui TODAS as coleções pelo conteúdo do arquivo. Violações de
    /// integridade (ids duplicados, referências quebradas) abortam a
    /// transação inteira e voltam como InvalidBackup.
    pub async fn restore(&self, pool: &PgPool, file: &BackupFile) -> Result<RestoreReport, AppError> {
        let result = self.restore_within(pool, file).await;
        result.map_err(|e| {
            if let AppError::DatabaseError(sqlx::Error::Database(db_err)) = &e {
                if db_err.is_foreign_key_violation()
                    || db_err.is_unique_violation()
                    || db_err.is_check_violation()
                {
                    return AppError::InvalidBackup(db_err.message().to_string());
                }
            }
            e
        })
    }

    async fn restore_within(
        &self,
        pool: &PgPool,
        file: &BackupFile,
    ) -> Result<RestoreReport, AppError> {
        let mut tx = pool.begin().await?;

        // Limpa na ordem inversa das dependências.
        for table in [
            "sale_items",
            "budget_items",
            "service_order_items",
            "discards",
            "sales",
            "service_orders",
            "budgets",
            "products",
            "customers",
        ] {
            sqlx::query(&format!("DELETE FROM {table}")).execute(&mut *tx).await?;
        }

        for c in &file.customers {
            sqlx::query(
                r#"
                INSERT INTO customers (id, name, email, phone, document, address, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(c.id)
            .bind(&c.name)
            .bind(&c.email)
            .bind(&c.phone)
            .bind(&c.document)
            .bind(&c.address)
            .bind(c.created_at)
            .execute(&mut *tx)
            .await?;
        }

        for p in &file.products {
            sqlx::query(
                r#"
                INSERT INTO products (id, name, description, kind, price, cost, quantity,
                                      low_stock_threshold, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(p.id)
            .bind(&p.name)
            .bind(&p.description)
            .bind(p.kind)
            .bind(p.price)
            .bind(p.cost)
            .bind(p.quantity)
            .bind(p.low_stock_threshold)
            .bind(p.created_at)
            .execute(&mut *tx)
            .await?;
        }

        for b in &file.budgets {
            sqlx::query(
                r#"
                INSERT INTO budgets (id, customer_id, status, total_amount, budget_date,
                                     valid_until, notes, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(b.id)
            .bind(b.customer_id)
            .bind(b.status)
            .bind(b.total_amount)
            .bind(b.budget_date)
            .bind(b.valid_until)
            .bind(&b.notes)
            .bind(b.created_at)
            .execute(&mut *tx)
            .await?;

            for item in &b.items {
                sqlx::query(
                    "INSERT INTO budget_items (budget_id, product_id, quantity, unit_price)
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(b.id)
                .bind(item.product_id)
                .bind(item.quantity)
                .bind(item.unit_price)
                .execute(&mut *tx)
                .await?;
            }
        }

        for s in &file.sales {
            sqlx::query(
                r#"
                INSERT INTO sales (id, customer_id, budget_id, status, payment_method,
                                   total_amount, down_payment, amount_receivable, sale_date, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(s.id)
            .bind(s.customer_id)
            .bind(s.budget_id)
            .bind(s.status)
            .bind(s.payment_method)
            .bind(s.total_amount)
            .bind(s.down_payment)
            .bind(s.amount_receivable)
            .bind(s.sale_date)
            .bind(s.created_at)
            .execute(&mut *tx)
            .await?;

            for item in &s.items {
                sqlx::query(
                    "INSERT INTO sale_items (sale_id, product_id, quantity, unit_price)
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(s.id)
                .bind(item.product_id)
                .bind(item.quantity)
                .bind(item.unit_price)
                .execute(&mut *tx)
                .await?;
            }
        }

        for o in &file.service_orders {
            sqlx::query(
                r#"
                INSERT INTO service_orders (id, customer_id, description, status, total_amount,
                                            entry_date, exit_date, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(o.id)
            .bind(o.customer_id)
            .bind(&o.description)
            .bind(o.status)
            .bind(o.total_amount)
            .bind(o.entry_date)
            .bind(o.exit_date)
            .bind(o.created_at)
            .execute(&mut *tx)
            .await?;

            for item in &o.items {
                sqlx::query(
                    "INSERT INTO service_order_items (service_order_id, product_id, quantity, unit_price)
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(o.id)
                .bind(item.product_id)
                .bind(item.quantity)
                .bind(item.unit_price)
                .execute(&mut *tx)
                .await?;
            }
        }

        for d in &file.discards {
            sqlx::query(
                r#"
                INSERT INTO discards (id, product_id, quantity, reason, discard_date, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(d.id)
            .bind(d.product_id)
            .bind(d.quantity)
            .bind(&d.reason)
            .bind(d.discard_date)
            .bind(d.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Backup restaurado: {} clientes, {} produtos, {} orçamentos, {} vendas, {} OS, {} descartes.",
            file.customers.len(),
            file.products.len(),
            file.budgets.len(),
            file.sales.len(),
            file.service_orders.len(),
            file.discards.len()
        );

        Ok(RestoreReport {
            customers: file.customers.len() as u32,
            products: file.products.len() as u32,
            budgets: file.budgets.len() as u32,
            sales: file.sales.len() as u32,
            service_orders: file.service_orders.len() as u32,
            discards: file.discards.len() as u32,
        })
    }
}

impl Default for BackupService {
    fn default() -> Self {
        Self::new()
    }
}
