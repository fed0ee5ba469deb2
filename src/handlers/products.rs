// src/handlers/products.rs

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
    models::product::{Product, ProductKind},
};

// ---
// Validação Customizada
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: CreateProduct
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Filtro de óleo")]
    pub name: String,

    pub description: Option<String>,

    pub kind: ProductKind,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "49.90")]
    pub price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)] // Se o JSON não tiver esse campo, assume 0
    pub cost: Decimal,

    #[validate(range(min = 0, message = "O estoque inicial não pode ser negativo."))]
    pub quantity: Option<i32>,

    #[validate(range(min = 0, message = "O limiar não pode ser negativo."))]
    pub low_stock_threshold: Option<i32>,
}

impl CreateProductPayload {
    // Regra: SERVICE não controla estoque; mandar quantidade é erro de quem chama.
    fn validate_consistency(&self) -> Result<(), ValidationError> {
        if self.kind == ProductKind::Service && self.quantity.is_some() {
            let mut err = ValidationError::new("ServiceHasNoStock");
            err.message = Some("Produtos do tipo serviço não controlam estoque.".into());
            return Err(err);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub cost: Decimal,

    #[validate(range(min = 0, message = "O limiar não pode ser negativo."))]
    pub low_stock_threshold: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStockPayload {
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 10)]
    pub quantity: i32,
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Produtos",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.validate_consistency().map_err(|e| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("quantity", e);
        AppError::ValidationError(errors)
    })?;

    let product = app_state
        .product_service
        .create(
            &app_state.db_pool,
            &payload.name,
            payload.description.as_deref(),
            payload.kind,
            payload.price,
            payload.cost,
            payload.quantity,
            payload.low_stock_threshold,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Produtos",
    responses(
        (status = 200, description = "Lista de produtos", body = Vec<Product>)
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.product_service.list().await?;
    Ok((StatusCode::OK, Json(products)))
}

// GET /api/products/low-stock
#[utoipa::path(
    get,
    path = "/api/products/low-stock",
    tag = "Produtos",
    responses(
        (status = 200, description = "Produtos no limiar de alerta", body = Vec<Product>)
    )
)]
pub async fn list_low_stock(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.product_service.list_low_stock().await?;
    Ok((StatusCode::OK, Json(products)))
}

// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Produtos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = Product),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.get(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(product)))
}

// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Produtos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .product_service
        .update(
            &app_state.db_pool,
            id,
            &payload.name,
            payload.description.as_deref(),
            payload.price,
            payload.cost,
            payload.low_stock_threshold,
        )
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Produtos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto removido"),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.product_service.delete(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/products/{id}/stock-entry
#[utoipa::path(
    post,
    path = "/api/products/{id}/stock-entry",
    tag = "Produtos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = AddStockPayload,
    responses(
        (status = 200, description = "Entrada registrada", body = Product),
        (status = 400, description = "Produto não controla estoque"),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn add_stock(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .product_service
        .add_stock(&app_state.db_pool, id, payload.quantity)
        .await?;

    Ok((StatusCode::OK, Json(product)))
}
