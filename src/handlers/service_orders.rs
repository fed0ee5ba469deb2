// src/handlers/service_orders.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        sale::LineItem,
        service_order::{ServiceOrder, ServiceOrderDetail, ServiceOrderStatus},
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceOrderPayload {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub customer_id: Uuid,

    #[schema(example = "Revisão completa + troca de óleo")]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "A ordem precisa de ao menos um item."), nested)]
    pub items: Vec<LineItem>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceOrderItemsPayload {
    pub description: Option<String>,

    #[validate(length(min = 1, message = "A ordem precisa de ao menos um item."), nested)]
    pub items: Vec<LineItem>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPayload {
    pub status: ServiceOrderStatus,
}

// POST /api/service-orders
#[utoipa::path(
    post,
    path = "/api/service-orders",
    tag = "Ordens de Serviço",
    request_body = CreateServiceOrderPayload,
    responses(
        (status = 201, description = "OS aberta, estoque debitado", body = ServiceOrderDetail),
        (status = 404, description = "Cliente ou produto inexistente"),
        (status = 422, description = "Estoque insuficiente")
    )
)]
pub async fn create_service_order(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateServiceOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state
        .service_order_service
        .create(
            &app_state.db_pool,
            payload.customer_id,
            payload.description.as_deref(),
            &payload.items,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/service-orders
#[utoipa::path(
    get,
    path = "/api/service-orders",
    tag = "Ordens de Serviço",
    responses(
        (status = 200, description = "Lista de ordens de serviço", body = Vec<ServiceOrder>)
    )
)]
pub async fn list_service_orders(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.service_order_service.list().await?;
    Ok((StatusCode::OK, Json(orders)))
}

// GET /api/service-orders/{id}
#[utoipa::path(
    get,
    path = "/api/service-orders/{id}",
    tag = "Ordens de Serviço",
    params(("id" = Uuid, Path, description = "ID da ordem de serviço")),
    responses(
        (status = 200, description = "OS com itens", body = ServiceOrderDetail),
        (status = 404, description = "OS não encontrada")
    )
)]
pub async fn get_service_order(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state
        .service_order_service
        .get_detail(&app_state.db_pool, id)
        .await?;
    Ok((StatusCode::OK, Json(detail)))
}

// PUT /api/service-orders/{id}/items
// Edição com reconciliação incremental: quantidades antigas voltam ao
// estoque, as novas são debitadas pelo delta líquido.
#[utoipa::path(
    put,
    path = "/api/service-orders/{id}/items",
    tag = "Ordens de Serviço",
    params(("id" = Uuid, Path, description = "ID da ordem de serviço")),
    request_body = UpdateServiceOrderItemsPayload,
    responses(
        (status = 200, description = "Itens atualizados", body = ServiceOrderDetail),
        (status = 422, description = "Estoque insuficiente para o delta")
    )
)]
pub async fn update_service_order_items(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServiceOrderItemsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state
        .service_order_service
        .update_items(
            &app_state.db_pool,
            id,
            payload.description.as_deref(),
            &payload.items,
        )
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/service-orders/{id}/transition
#[utoipa::path(
    post,
    path = "/api/service-orders/{id}/transition",
    tag = "Ordens de Serviço",
    params(("id" = Uuid, Path, description = "ID da ordem de serviço")),
    request_body = TransitionPayload,
    responses(
        (status = 200, description = "Status avançado", body = ServiceOrder),
        (status = 409, description = "Transição inválida")
    )
)]
pub async fn transition_service_order(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .service_order_service
        .transition(&app_state.db_pool, id, payload.status)
        .await?;
    Ok((StatusCode::OK, Json(order)))
}

// DELETE /api/service-orders/{id}
#[utoipa::path(
    delete,
    path = "/api/service-orders/{id}",
    tag = "Ordens de Serviço",
    params(("id" = Uuid, Path, description = "ID da ordem de serviço")),
    responses(
        (status = 204, description = "OS removida, estoque restaurado"),
        (status = 404, description = "OS não encontrada")
    )
)]
pub async fn delete_service_order(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.service_order_service.delete(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
