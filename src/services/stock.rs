// src/services/stock.rs
//
// Miolo compartilhado de estoque: planejamento puro (validação all-or-nothing
// contra um snapshot) e aplicação transacional (decremento condicional no
// banco). Usado pela conversão de orçamento/venda, pela varredura de
// reconciliação, pela edição de ordens de serviço e pelos descartes.

use std::collections::{BTreeMap, HashMap};

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::{
        product::{Product, ProductKind},
        sale::LineItem,
    },
};

// --- Snapshot ---

/// O que a validação precisa saber de um produto no instante da decisão.
#[derive(Debug, Clone)]
pub struct ProductSnapshot {
    pub name: String,
    pub kind: ProductKind,
    pub quantity: Option<i32>,
}

impl From<&Product> for ProductSnapshot {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            kind: p.kind,
            quantity: p.quantity,
        }
    }
}

/// Snapshot de quantidades por produto. A varredura de reconciliação mantém
/// um destes compartilhado entre os orçamentos do mesmo passe, atualizando-o
/// a cada conversão bem-sucedida.
pub type StockSnapshot = HashMap<Uuid, ProductSnapshot>;

pub fn snapshot_from_products(products: &[Product]) -> StockSnapshot {
    products.iter().map(|p| (p.id, ProductSnapshot::from(p))).collect()
}

// --- Planejamento (puro) ---

/// Um débito de estoque já validado, pronto para virar UPDATE condicional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDecrement {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Valida todos os itens de linha contra o snapshot e devolve os débitos a
/// aplicar. All-or-nothing: a primeira insuficiência aborta o plano inteiro,
/// sem nada parcial. Produtos SERVICE são isentos; produto inexistente é erro
/// duro (nunca "pula a checagem").
///
/// Itens repetidos do mesmo produto são somados antes da validação, para que
/// dois itens de 3 unidades não passem individualmente num saldo de 4.
pub fn plan_decrements(
    snapshot: &StockSnapshot,
    items: &[LineItem],
) -> Result<Vec<StockDecrement>, AppError> {
    // Agrega por produto; BTreeMap dá ordem determinística de aplicação.
    let mut requested: BTreeMap<Uuid, i32> = BTreeMap::new();
    for item in items {
        *requested.entry(item.product_id).or_insert(0) += item.quantity;
    }

    let mut decrements = Vec::new();
    for (product_id, quantity) in requested {
        let product = snapshot
            .get(&product_id)
            .ok_or(AppError::ProductNotFound(product_id))?;

        if product.kind == ProductKind::Service {
            continue;
        }

        let available = product.quantity.unwrap_or(0);
        if available < quantity {
            return Err(AppError::StockInsufficient {
                product_id,
                product_name: product.name.clone(),
                available,
                requested: quantity,
            });
        }

        decrements.push(StockDecrement { product_id, quantity });
    }

    Ok(decrements)
}

/// Confere que todo item referencia um produto existente, sem checar saldo.
/// Orçamentos PENDING não reservam estoque, mas item órfão é erro duro.
pub fn ensure_products_exist(
    snapshot: &StockSnapshot,
    items: &[LineItem],
) -> Result<(), AppError> {
    for item in items {
        if !snapshot.contains_key(&item.product_id) {
            return Err(AppError::ProductNotFound(item.product_id));
        }
    }
    Ok(())
}

/// Baixa os débitos no snapshot em memória (usado pela varredura para
/// serializar orçamentos que competem pelo mesmo estoque dentro do passe).
pub fn apply_to_snapshot(snapshot: &mut StockSnapshot, decrements: &[StockDecrement]) {
    for dec in decrements {
        if let Some(product) = snapshot.get_mut(&dec.product_id) {
            if let Some(q) = product.quantity.as_mut() {
                *q -= dec.quantity;
            }
        }
    }
}

// --- Deltas líquidos (edição de documentos que já consumiram estoque) ---

/// Diferença líquida por produto entre os itens antigos e os novos de um
/// documento. delta > 0 consome estoque, delta < 0 devolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDelta {
    pub product_id: Uuid,
    pub delta: i32,
}

/// Calcula o delta líquido por produto de uma edição. O invariante é
/// `disponível para a nova alocação = saldo atual + quantidade devolvida`:
/// reduzir o consumo de um produto nunca pode ser rejeitado por falta de
/// estoque, porque o líquido dele é negativo.
pub fn net_deltas(old_items: &[LineItem], new_items: &[LineItem]) -> Vec<StockDelta> {
    let mut totals: BTreeMap<Uuid, i32> = BTreeMap::new();
    for item in new_items {
        *totals.entry(item.product_id).or_insert(0) += item.quantity;
    }
    for item in old_items {
        *totals.entry(item.product_id).or_insert(0) -= item.quantity;
    }

    totals
        .into_iter()
        .filter(|(_, delta)| *delta != 0)
        .map(|(product_id, delta)| StockDelta { product_id, delta })
        .collect()
}

// --- Aplicação (transacional) ---

/// Executa os débitos planejados via decremento condicional. Um decremento
/// recusado pelo banco (corrida perdida desde a leitura) vira
/// StockInsufficient com o saldo que restou, e a transação do chamador cai
/// inteira.
pub async fn apply_decrements(
    repo: &ProductRepository,
    conn: &mut PgConnection,
    decrements: &[StockDecrement],
) -> Result<(), AppError> {
    for dec in decrements {
        let ok = repo
            .try_decrement_stock(&mut *conn, dec.product_id, dec.quantity)
            .await?;
        if !ok {
            let product = repo
                .find_by_id(&mut *conn, dec.product_id)
                .await?
                .ok_or(AppError::ProductNotFound(dec.product_id))?;
            return Err(AppError::StockInsufficient {
                product_id: dec.product_id,
                product_name: product.name,
                available: product.quantity.unwrap_or(0),
                requested: dec.quantity,
            });
        }
    }
    Ok(())
}

/// Aplica deltas líquidos de uma edição: devoluções primeiro, depois os
/// consumos. Assim um orçamento de edição que devolve 2 de A e consome 2 de B
/// não depende da ordem dos produtos para validar.
pub async fn apply_deltas(
    repo: &ProductRepository,
    conn: &mut PgConnection,
    deltas: &[StockDelta],
) -> Result<(), AppError> {
    // Todo produto referenciado precisa existir, mesmo os que só devolvem.
    for delta in deltas {
        let product = repo
            .find_by_id(&mut *conn, delta.product_id)
            .await?
            .ok_or(AppError::ProductNotFound(delta.product_id))?;

        if product.kind == ProductKind::Service {
            continue;
        }

        if delta.delta < 0 {
            repo.increment_stock(&mut *conn, delta.product_id, -delta.delta).await?;
        }
    }

    for delta in deltas {
        if delta.delta <= 0 {
            continue;
        }
        let ok = repo
            .try_decrement_stock(&mut *conn, delta.product_id, delta.delta)
            .await?;
        if !ok {
            let product = repo
                .find_by_id(&mut *conn, delta.product_id)
                .await?
                .ok_or(AppError::ProductNotFound(delta.product_id))?;
            // SERVICE não rastreia estoque; o decremento condicional não o
            // atinge e isso não é insuficiência.
            if product.kind == ProductKind::Service {
                continue;
            }
            return Err(AppError::StockInsufficient {
                product_id: delta.product_id,
                product_name: product.name,
                available: product.quantity.unwrap_or(0),
                requested: delta.delta,
            });
        }
    }

    Ok(())
}

/// Devolve ao estoque as quantidades de itens de um documento excluído.
/// Produtos SERVICE são ignorados pelo próprio UPDATE.
pub async fn restore_items(
    repo: &ProductRepository,
    conn: &mut PgConnection,
    items: &[LineItem],
) -> Result<(), AppError> {
    let mut totals: BTreeMap<Uuid, i32> = BTreeMap::new();
    for item in items {
        *totals.entry(item.product_id).or_insert(0) += item.quantity;
    }
    for (product_id, quantity) in totals {
        repo.increment_stock(&mut *conn, product_id, quantity).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn piece(name: &str, quantity: i32) -> ProductSnapshot {
        ProductSnapshot {
            name: name.to_string(),
            kind: ProductKind::Piece,
            quantity: Some(quantity),
        }
    }

    fn service(name: &str) -> ProductSnapshot {
        ProductSnapshot {
            name: name.to_string(),
            kind: ProductKind::Service,
            quantity: None,
        }
    }

    fn line(product_id: Uuid, quantity: i32) -> LineItem {
        LineItem::new(product_id, quantity, Decimal::new(1000, 2))
    }

    #[test]
    fn test_plan_respects_available_stock() {
        let id = Uuid::new_v4();
        let snapshot = StockSnapshot::from([(id, piece("Parafuso", 5))]);

        let plan = plan_decrements(&snapshot, &[line(id, 5)]).unwrap();
        assert_eq!(plan, vec![StockDecrement { product_id: id, quantity: 5 }]);

        // Pedir mais do que há rejeita com o déficit identificado.
        let err = plan_decrements(&snapshot, &[line(id, 6)]).unwrap_err();
        match err {
            AppError::StockInsufficient { product_id, available, requested, .. } => {
                assert_eq!(product_id, id);
                assert_eq!(available, 5);
                assert_eq!(requested, 6);
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn test_plan_is_all_or_nothing() {
        // A tem 5, B tem 0. Pedir {A:3, B:1} não pode render plano parcial.
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let snapshot = StockSnapshot::from([(a, piece("A", 5)), (b, piece("B", 0))]);

        let result = plan_decrements(&snapshot, &[line(a, 3), line(b, 1)]);
        assert!(matches!(result, Err(AppError::StockInsufficient { .. })));

        // O snapshot é imutável durante o planejamento: A continua com 5.
        assert_eq!(snapshot[&a].quantity, Some(5));
    }

    #[test]
    fn test_plan_exempts_service_products() {
        let svc = Uuid::new_v4();
        let snapshot = StockSnapshot::from([(svc, service("Mão de obra"))]);

        // Qualquer quantidade passa e nenhum débito é gerado.
        let plan = plan_decrements(&snapshot, &[line(svc, 999)]).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_plan_rejects_missing_product() {
        let ghost = Uuid::new_v4();
        let snapshot = StockSnapshot::new();

        let err = plan_decrements(&snapshot, &[line(ghost, 1)]).unwrap_err();
        assert!(matches!(err, AppError::ProductNotFound(id) if id == ghost));
    }

    #[test]
    fn test_plan_merges_duplicate_lines() {
        // Dois itens de 3 do mesmo produto num saldo de 4: a soma (6) reprova.
        let id = Uuid::new_v4();
        let snapshot = StockSnapshot::from([(id, piece("Cabo", 4))]);

        let result = plan_decrements(&snapshot, &[line(id, 3), line(id, 3)]);
        assert!(matches!(result, Err(AppError::StockInsufficient { requested: 6, .. })));
    }

    #[test]
    fn test_apply_to_snapshot_progressive() {
        let id = Uuid::new_v4();
        let mut snapshot = StockSnapshot::from([(id, piece("Parafuso", 5))]);

        let plan = plan_decrements(&snapshot, &[line(id, 3)]).unwrap();
        apply_to_snapshot(&mut snapshot, &plan);
        assert_eq!(snapshot[&id].quantity, Some(2));

        // O próximo orçamento do mesmo passe enxerga só o que sobrou.
        assert!(plan_decrements(&snapshot, &[line(id, 3)]).is_err());
        assert!(plan_decrements(&snapshot, &[line(id, 2)]).is_ok());
    }

    #[test]
    fn test_net_deltas_reduction_returns_stock() {
        // OS consumia 3 de P; edição reduz para 1. Líquido: devolver 2.
        let p = Uuid::new_v4();
        let deltas = net_deltas(&[line(p, 3)], &[line(p, 1)]);
        assert_eq!(deltas, vec![StockDelta { product_id: p, delta: -2 }]);
    }

    #[test]
    fn test_net_deltas_mixed_edit() {
        let kept = Uuid::new_v4();
        let removed = Uuid::new_v4();
        let added = Uuid::new_v4();

        let old_items = vec![line(kept, 2), line(removed, 1)];
        let new_items = vec![line(kept, 2), line(added, 4)];

        let deltas = net_deltas(&old_items, &new_items);
        // `kept` não muda, logo não aparece.
        assert_eq!(deltas.len(), 2);
        assert!(deltas.contains(&StockDelta { product_id: removed, delta: -1 }));
        assert!(deltas.contains(&StockDelta { product_id: added, delta: 4 }));
    }

    #[test]
    fn test_net_deltas_unchanged_is_empty() {
        let p = Uuid::new_v4();
        assert!(net_deltas(&[line(p, 2)], &[line(p, 2)]).is_empty());
    }
}
