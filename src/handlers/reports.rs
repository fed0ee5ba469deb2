// src/handlers/reports.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState};

// GET /api/reports/sales/{id}
#[utoipa::path(
    get,
    path = "/api/reports/sales/{id}",
    tag = "Relatórios",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "PDF da venda", body = Vec<u8>, content_type = "application/pdf"),
        (status = 404, description = "Venda não encontrada")
    )
)]
pub async fn sale_pdf(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = app_state
        .report_service
        .generate_sale_pdf(&app_state.db_pool, id)
        .await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/pdf")],
        bytes,
    ))
}

// GET /api/reports/budgets/{id}
#[utoipa::path(
    get,
    path = "/api/reports/budgets/{id}",
    tag = "Relatórios",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "PDF do orçamento", body = Vec<u8>, content_type = "application/pdf"),
        (status = 404, description = "Orçamento não encontrado")
    )
)]
pub async fn budget_pdf(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = app_state
        .report_service
        .generate_budget_pdf(&app_state.db_pool, id)
        .await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/pdf")],
        bytes,
    ))
}
