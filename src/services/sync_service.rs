// src/services/sync_service.rs
//
// Varredura de reconciliação: encontra orçamentos APPROVED que ainda não têm
// venda correspondente (pela back-reference sales.budget_id) e reconverte um
// a um. Melhor esforço entre orçamentos: falha de um não derruba o passe.

use std::collections::HashSet;

use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BudgetRepository, ProductRepository, SaleRepository},
    models::{budget::Budget, sale::LineItem},
    services::{conversion_service::ConversionService, stock},
};

/// Resultado do passe. Rodar duas vezes sem mudanças no meio produz
/// `created = 0` na segunda: a diferença de conjuntos fica vazia.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    #[schema(example = 2)]
    pub created: u32,
    #[schema(example = 1)]
    pub skipped: u32,
    pub errors: Vec<Uuid>,
}

#[derive(Clone)]
pub struct SyncService {
    budget_repo: BudgetRepository,
    sale_repo: SaleRepository,
    product_repo: ProductRepository,
    conversion_service: ConversionService,
}

impl SyncService {
    pub fn new(
        budget_repo: BudgetRepository,
        sale_repo: SaleRepository,
        product_repo: ProductRepository,
        conversion_service: ConversionService,
    ) -> Self {
        Self {
            budget_repo,
            sale_repo,
            product_repo,
            conversion_service,
        }
    }

    pub async fn sync_approved_budgets(&self, pool: &PgPool) -> Result<SyncReport, AppError> {
        // 1/2/3. Aprovados menos os já reivindicados por alguma venda.
        let approved = self.budget_repo.find_approved(pool).await?;
        let claimed: HashSet<Uuid> =
            self.sale_repo.claimed_budget_ids(pool).await?.into_iter().collect();
        let to_convert = unclaimed_budgets(approved, &claimed);

        if to_convert.is_empty() {
            tracing::info!("Varredura: nenhum orçamento aprovado sem venda.");
            return Ok(SyncReport { created: 0, skipped: 0, errors: Vec::new() });
        }

        tracing::info!(
            "Varredura: {} orçamento(s) aprovado(s) sem venda correspondente.",
            to_convert.len()
        );

        // 4. Snapshot compartilhado do passe. Orçamentos são processados em
        //    sequência; cada conversão bem-sucedida baixa o snapshot, então
        //    dois orçamentos disputando o mesmo estoque são serializados aqui
        //    mesmo com cada um commitando sua própria transação.
        let products = self.product_repo.get_all().await?;
        let mut snapshot = stock::snapshot_from_products(&products);

        let mut report = SyncReport { created: 0, skipped: 0, errors: Vec::new() };

        for budget in to_convert {
            let items: Vec<LineItem> = match self.budget_repo.list_items(pool, budget.id).await {
                Ok(rows) => rows.iter().map(LineItem::from).collect(),
                Err(e) => {
                    tracing::error!("Varredura: falha lendo itens do orçamento {}: {}", budget.id, e);
                    report.errors.push(budget.id);
                    continue;
                }
            };

            // Pré-validação contra o snapshot do passe. 5. Insuficiência pula
            // o orçamento e segue para o próximo, sem nada parcial.
            match stock::plan_decrements(&snapshot, &items) {
                Ok(_) => {}
                Err(AppError::StockInsufficient { product_name, available, requested, .. }) => {
                    tracing::warn!(
                        "Varredura: orçamento {} pulado, estoque insuficiente de '{}' ({} < {}).",
                        budget.id, product_name, available, requested
                    );
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    tracing::error!("Varredura: orçamento {} com itens inválidos: {}", budget.id, e);
                    report.errors.push(budget.id);
                    continue;
                }
            }

            // A conversão revalida com leitura fresca dentro da própria
            // transação; o banco tem a palavra final via decremento condicional.
            match self.conversion_service.convert_for_sync(pool, &budget, &items).await {
                Ok((sale, decrements)) => {
                    tracing::info!("Varredura: orçamento {} convertido na venda {}.", budget.id, sale.id);
                    stock::apply_to_snapshot(&mut snapshot, &decrements);
                    report.created += 1;
                }
                Err(AppError::StockInsufficient { .. }) => {
                    // Outra aba/usuário consumiu o estoque entre o snapshot e o commit.
                    report.skipped += 1;
                }
                Err(AppError::BudgetAlreadyConverted) => {
                    // Alguém reivindicou este orçamento durante o passe.
                    report.skipped += 1;
                }
                Err(e) => {
                    tracing::error!("Varredura: falha convertendo orçamento {}: {}", budget.id, e);
                    report.errors.push(budget.id);
                }
            }
        }

        tracing::info!(
            "Varredura concluída: {} criada(s), {} pulado(s), {} erro(s).",
            report.created, report.skipped, report.errors.len()
        );
        Ok(report)
    }
}

/// Diferença de conjuntos: orçamentos aprovados que nenhuma venda reivindica.
fn unclaimed_budgets(approved: Vec<Budget>, claimed: &HashSet<Uuid>) -> Vec<Budget> {
    approved.into_iter().filter(|b| !claimed.contains(&b.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::budget::BudgetStatus;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn budget(id: Uuid) -> Budget {
        let date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        Budget {
            id,
            customer_id: Uuid::new_v4(),
            status: BudgetStatus::Approved,
            total_amount: Decimal::new(10000, 2),
            budget_date: date,
            valid_until: date,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_unclaimed_is_set_difference() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        let claimed = HashSet::from([a, c]);
        let result = unclaimed_budgets(vec![budget(a), budget(b), budget(c)], &claimed);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, b);
    }

    #[test]
    fn test_all_claimed_yields_nothing() {
        // Segunda execução do passe sem mudanças: todo aprovado já tem venda.
        let a = Uuid::new_v4();
        let claimed = HashSet::from([a]);
        assert!(unclaimed_budgets(vec![budget(a)], &claimed).is_empty());
    }

    #[test]
    fn test_sweep_skips_first_and_still_converts_second() {
        // Dois orçamentos disputando o mesmo produto (saldo 3): o primeiro
        // pede 5 e é pulado; o segundo pede 2 e converte. A decisão é
        // exatamente a que o passe toma contra o snapshot compartilhado.
        let p = Uuid::new_v4();
        let mut snapshot = stock::StockSnapshot::from([(
            p,
            stock::ProductSnapshot {
                name: "Compressor".to_string(),
                kind: crate::models::product::ProductKind::Piece,
                quantity: Some(3),
            },
        )]);

        let first = vec![LineItem::new(p, 5, Decimal::new(100, 2))];
        let second = vec![LineItem::new(p, 2, Decimal::new(100, 2))];

        assert!(matches!(
            stock::plan_decrements(&snapshot, &first),
            Err(AppError::StockInsufficient { .. })
        ));
        // O pulo não mexe no snapshot; o segundo ainda cabe.
        let plan = stock::plan_decrements(&snapshot, &second).unwrap();
        stock::apply_to_snapshot(&mut snapshot, &plan);
        assert_eq!(snapshot[&p].quantity, Some(1));
    }
}
