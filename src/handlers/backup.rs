// src/handlers/backup.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    models::backup::BackupFile,
    services::backup_service::RestoreReport,
};

// GET /api/backup
#[utoipa::path(
    get,
    path = "/api/backup",
    tag = "Backup",
    responses(
        (status = 200, description = "Todas as coleções em um único JSON", body = BackupFile)
    )
)]
pub async fn export_backup(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let file = app_state.backup_service.export(&app_state.db_pool).await?;
    Ok((StatusCode::OK, Json(file)))
}

// POST /api/backup/restore
// Substitui TODAS as coleções pelo conteúdo do arquivo, numa única transação.
#[utoipa::path(
    post,
    path = "/api/backup/restore",
    tag = "Backup",
    request_body = BackupFile,
    responses(
        (status = 200, description = "Backup restaurado", body = RestoreReport),
        (status = 400, description = "Arquivo de backup inválido")
    )
)]
pub async fn restore_backup(
    State(app_state): State<AppState>,
    Json(file): Json<BackupFile>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .backup_service
        .restore(&app_state.db_pool, &file)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}
