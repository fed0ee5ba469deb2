// src/handlers/budgets.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        budget::{Budget, BudgetDetail, BudgetStatus},
        sale::{LineItem, Sale},
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPayload {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub customer_id: Uuid,

    #[validate(length(min = 1, message = "O orçamento precisa de ao menos um item."), nested)]
    pub items: Vec<LineItem>,

    #[schema(value_type = String, format = Date, example = "2026-08-01")]
    pub budget_date: NaiveDate,

    #[schema(value_type = String, format = Date, example = "2026-08-31")]
    pub valid_until: NaiveDate,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListBudgetsQuery {
    pub status: Option<BudgetStatus>,
}

// POST /api/budgets
#[utoipa::path(
    post,
    path = "/api/budgets",
    tag = "Orçamentos",
    request_body = BudgetPayload,
    responses(
        (status = 201, description = "Orçamento criado (PENDING)", body = BudgetDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente ou produto inexistente")
    )
)]
pub async fn create_budget(
    State(app_state): State<AppState>,
    Json(payload): Json<BudgetPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state
        .budget_service
        .create(
            &app_state.db_pool,
            payload.customer_id,
            &payload.items,
            payload.budget_date,
            payload.valid_until,
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/budgets?status=PENDING
#[utoipa::path(
    get,
    path = "/api/budgets",
    tag = "Orçamentos",
    params(("status" = Option<BudgetStatus>, Query, description = "Filtro por status")),
    responses(
        (status = 200, description = "Lista de orçamentos", body = Vec<Budget>)
    )
)]
pub async fn list_budgets(
    State(app_state): State<AppState>,
    Query(query): Query<ListBudgetsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let budgets = app_state.budget_service.list(query.status).await?;
    Ok((StatusCode::OK, Json(budgets)))
}

// GET /api/budgets/{id}
#[utoipa::path(
    get,
    path = "/api/budgets/{id}",
    tag = "Orçamentos",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "Orçamento com itens", body = BudgetDetail),
        (status = 404, description = "Orçamento não encontrado")
    )
)]
pub async fn get_budget(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.budget_service.get_detail(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// PUT /api/budgets/{id}
#[utoipa::path(
    put,
    path = "/api/budgets/{id}",
    tag = "Orçamentos",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    request_body = BudgetPayload,
    responses(
        (status = 200, description = "Orçamento atualizado", body = BudgetDetail),
        (status = 409, description = "Orçamento não está mais pendente")
    )
)]
pub async fn update_budget(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state
        .budget_service
        .update(
            &app_state.db_pool,
            id,
            payload.customer_id,
            &payload.items,
            payload.budget_date,
            payload.valid_until,
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

// DELETE /api/budgets/{id}
#[utoipa::path(
    delete,
    path = "/api/budgets/{id}",
    tag = "Orçamentos",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 204, description = "Orçamento removido"),
        (status = 409, description = "Orçamento não está mais pendente")
    )
)]
pub async fn delete_budget(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.budget_service.delete(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/budgets/{id}/approve
// Converte o orçamento em venda: débitos de estoque, criação da venda e
// status APPROVED na mesma transação.
#[utoipa::path(
    post,
    path = "/api/budgets/{id}/approve",
    tag = "Orçamentos",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 201, description = "Venda criada a partir do orçamento", body = Sale),
        (status = 409, description = "Orçamento rejeitado ou já convertido"),
        (status = 422, description = "Estoque insuficiente")
    )
)]
pub async fn approve_budget(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.budget_service.approve(&app_state.db_pool, id).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

// POST /api/budgets/{id}/reject
#[utoipa::path(
    post,
    path = "/api/budgets/{id}/reject",
    tag = "Orçamentos",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "Orçamento rejeitado (terminal)", body = Budget),
        (status = 409, description = "Orçamento já aprovado")
    )
)]
pub async fn reject_budget(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let budget = app_state.budget_service.reject(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(budget)))
}
