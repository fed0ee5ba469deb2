// src/handlers/discards.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, models::discard::Discard};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscardPayload {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 3)]
    pub quantity: i32,

    #[validate(length(min = 1, message = "O motivo é obrigatório."))]
    #[schema(example = "Embalagem violada")]
    pub reason: String,

    // Ausente no JSON = hoje
    #[schema(value_type = Option<String>, format = Date, example = "2026-08-05")]
    pub discard_date: Option<NaiveDate>,
}

// POST /api/discards
#[utoipa::path(
    post,
    path = "/api/discards",
    tag = "Descartes",
    request_body = CreateDiscardPayload,
    responses(
        (status = 201, description = "Descarte registrado, estoque debitado", body = Discard),
        (status = 404, description = "Produto não encontrado"),
        (status = 422, description = "Estoque insuficiente")
    )
)]
pub async fn create_discard(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateDiscardPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let discard = app_state
        .discard_service
        .create(
            &app_state.db_pool,
            payload.product_id,
            payload.quantity,
            &payload.reason,
            payload.discard_date.unwrap_or_else(|| Utc::now().date_naive()),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(discard)))
}

// GET /api/discards
#[utoipa::path(
    get,
    path = "/api/discards",
    tag = "Descartes",
    responses(
        (status = 200, description = "Lista de descartes", body = Vec<Discard>)
    )
)]
pub async fn list_discards(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let discards = app_state.discard_service.list().await?;
    Ok((StatusCode::OK, Json(discards)))
}

// DELETE /api/discards/{id}
#[utoipa::path(
    delete,
    path = "/api/discards/{id}",
    tag = "Descartes",
    params(("id" = Uuid, Path, description = "ID do descarte")),
    responses(
        (status = 204, description = "Descarte desfeito, estoque restaurado"),
        (status = 404, description = "Descarte não encontrado")
    )
)]
pub async fn delete_discard(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.discard_service.delete(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
