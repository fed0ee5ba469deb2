use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regra de negócio: a conversão inteira aborta, nada é debitado.
    #[error("Estoque insuficiente para o produto {product_name}")]
    StockInsufficient {
        product_id: Uuid,
        product_name: String,
        available: i32,
        requested: i32,
    },

    // Item de linha apontando para produto inexistente bloqueia a operação.
    // Nunca é tratado como "pular a checagem de estoque".
    #[error("Produto não encontrado: {0}")]
    ProductNotFound(Uuid),

    #[error("Cliente não encontrado: {0}")]
    CustomerNotFound(Uuid),

    #[error("Orçamento não encontrado: {0}")]
    BudgetNotFound(Uuid),

    #[error("Venda não encontrada: {0}")]
    SaleNotFound(Uuid),

    #[error("Ordem de serviço não encontrada: {0}")]
    ServiceOrderNotFound(Uuid),

    #[error("Descarte não encontrado: {0}")]
    DiscardNotFound(Uuid),

    // Orçamento só é editável/excluível enquanto PENDING.
    #[error("Orçamento não está pendente")]
    BudgetNotPending,

    // REJECTED é terminal: nunca vira venda, por nenhum caminho.
    #[error("Orçamento foi rejeitado")]
    BudgetRejected,

    #[error("Orçamento já foi convertido em venda")]
    BudgetAlreadyConverted,

    #[error("Transição de status inválida")]
    InvalidStatusTransition,

    #[error("Arquivo de backup inválido: {0}")]
    InvalidBackup(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Estoque insuficiente devolve o produto ofensor e o déficit.
            AppError::StockInsufficient { product_id, ref product_name, available, requested } => {
                let body = Json(json!({
                    "error": format!("Estoque insuficiente para o produto '{}'.", product_name),
                    "details": {
                        "productId": product_id,
                        "available": available,
                        "requested": requested,
                        "shortfall": requested - available,
                    },
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }

            AppError::ProductNotFound(_) => (StatusCode::NOT_FOUND, "Produto não encontrado."),
            AppError::CustomerNotFound(_) => (StatusCode::NOT_FOUND, "Cliente não encontrado."),
            AppError::BudgetNotFound(_) => (StatusCode::NOT_FOUND, "Orçamento não encontrado."),
            AppError::SaleNotFound(_) => (StatusCode::NOT_FOUND, "Venda não encontrada."),
            AppError::ServiceOrderNotFound(_) => {
                (StatusCode::NOT_FOUND, "Ordem de serviço não encontrada.")
            }
            AppError::DiscardNotFound(_) => (StatusCode::NOT_FOUND, "Descarte não encontrado."),

            AppError::BudgetNotPending => (
                StatusCode::CONFLICT,
                "Apenas orçamentos pendentes podem ser alterados.",
            ),
            AppError::BudgetRejected => (
                StatusCode::CONFLICT,
                "Um orçamento rejeitado não pode ser convertido em venda.",
            ),
            AppError::BudgetAlreadyConverted => (
                StatusCode::CONFLICT,
                "Este orçamento já foi convertido em venda.",
            ),
            AppError::InvalidStatusTransition => (
                StatusCode::CONFLICT,
                "Transição de status inválida para a ordem de serviço.",
            ),

            AppError::InvalidBackup(ref reason) => {
                let body = Json(json!({
                    "error": "Arquivo de backup inválido.",
                    "details": reason,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
