// src/handlers/sales.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::sale::{total_amount, LineItem, PaymentMethod, Sale, SaleDetail, SaleStatus},
};

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalePayload {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub customer_id: Uuid,

    #[validate(length(min = 1, message = "A venda precisa de ao menos um item."), nested)]
    pub items: Vec<LineItem>,

    // Ausente no JSON = CASH
    pub payment_method: Option<PaymentMethod>,

    // Ausente no JSON = PENDING
    pub status: Option<SaleStatus>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub down_payment: Decimal,
}

impl CreateSalePayload {
    // Regra: a entrada não pode exceder o total dos itens.
    fn validate_consistency(&self) -> Result<(), ValidationError> {
        if self.down_payment > total_amount(&self.items) {
            let mut err = ValidationError::new("DownPaymentExceedsTotal");
            err.message = Some("A entrada não pode exceder o total da venda.".into());
            return Err(err);
        }
        Ok(())
    }
}

// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Vendas",
    request_body = CreateSalePayload,
    responses(
        (status = 201, description = "Venda criada, estoque debitado", body = Sale),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente ou produto inexistente"),
        (status = 422, description = "Estoque insuficiente")
    )
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.validate_consistency().map_err(|e| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("downPayment", e);
        AppError::ValidationError(errors)
    })?;

    let sale = app_state
        .sale_service
        .create(
            &app_state.db_pool,
            payload.customer_id,
            &payload.items,
            payload.payment_method.unwrap_or(PaymentMethod::Cash),
            payload.status.unwrap_or(SaleStatus::Pending),
            payload.down_payment,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Vendas",
    responses(
        (status = 200, description = "Lista de vendas", body = Vec<Sale>)
    )
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sale_service.list().await?;
    Ok((StatusCode::OK, Json(sales)))
}

// GET /api/sales/{id}
#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "Vendas",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda com itens", body = SaleDetail),
        (status = 404, description = "Venda não encontrada")
    )
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.sale_service.get_detail(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/sales/{id}/settle
#[utoipa::path(
    post,
    path = "/api/sales/{id}/settle",
    tag = "Vendas",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda quitada", body = Sale),
        (status = 404, description = "Venda não encontrada")
    )
)]
pub async fn settle_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sale_service.settle(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(sale)))
}

// DELETE /api/sales/{id}
#[utoipa::path(
    delete,
    path = "/api/sales/{id}",
    tag = "Vendas",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 204, description = "Venda removida, estoque restaurado"),
        (status = 404, description = "Venda não encontrada")
    )
)]
pub async fn delete_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.sale_service.delete(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
