// src/handlers/sync.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{common::error::AppError, config::AppState, services::sync_service::SyncReport};

// POST /api/sync/budgets
// Varredura de reconciliação: converte orçamentos APPROVED que ainda não têm
// venda correspondente. Idempotente: sem mudanças no meio, a segunda chamada
// devolve created = 0.
#[utoipa::path(
    post,
    path = "/api/sync/budgets",
    tag = "Reconciliação",
    responses(
        (status = 200, description = "Relatório do passe", body = SyncReport)
    )
)]
pub async fn sync_budgets(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .sync_service
        .sync_approved_budgets(&app_state.db_pool)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}
