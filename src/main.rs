//src/main.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let customer_routes = Router::new()
        .route("/"
               ,post(handlers::customers::create_customer)
               .get(handlers::customers::list_customers)
        )
        .route("/{id}"
               ,get(handlers::customers::get_customer)
               .put(handlers::customers::update_customer)
               .delete(handlers::customers::delete_customer)
        );

    let product_routes = Router::new()
        .route("/"
               ,post(handlers::products::create_product)
               .get(handlers::products::list_products)
        )
        .route("/low-stock"
               ,get(handlers::products::list_low_stock)
        )
        .route("/{id}"
               ,get(handlers::products::get_product)
               .put(handlers::products::update_product)
               .delete(handlers::products::delete_product)
        )
        .route("/{id}/stock-entry"
               ,post(handlers::products::add_stock)
        );

    let budget_routes = Router::new()
        .route("/"
               ,post(handlers::budgets::create_budget)
               .get(handlers::budgets::list_budgets)
        )
        .route("/{id}"
               ,get(handlers::budgets::get_budget)
               .put(handlers::budgets::update_budget)
               .delete(handlers::budgets::delete_budget)
        )
        // Aprovar = converter em venda (estoque + venda + status, uma transação)
        .route("/{id}/approve"
               ,post(handlers::budgets::approve_budget)
        )
        .route("/{id}/reject"
               ,post(handlers::budgets::reject_budget)
        );

    let sale_routes = Router::new()
        .route("/"
               ,post(handlers::sales::create_sale)
               .get(handlers::sales::list_sales)
        )
        .route("/{id}"
               ,get(handlers::sales::get_sale)
               .delete(handlers::sales::delete_sale)
        )
        .route("/{id}/settle"
               ,post(handlers::sales::settle_sale)
        );

    let service_order_routes = Router::new()
        .route("/"
               ,post(handlers::service_orders::create_service_order)
               .get(handlers::service_orders::list_service_orders)
        )
        .route("/{id}"
               ,get(handlers::service_orders::get_service_order)
               .delete(handlers::service_orders::delete_service_order)
        )
        .route("/{id}/items"
               ,put(handlers::service_orders::update_service_order_items)
        )
        .route("/{id}/transition"
               ,post(handlers::service_orders::transition_service_order)
        );

    let discard_routes = Router::new()
        .route("/"
               ,post(handlers::discards::create_discard)
               .get(handlers::discards::list_discards)
        )
        .route("/{id}"
               ,axum::routing::delete(handlers::discards::delete_discard)
        );

    let sync_routes = Router::new()
        .route("/budgets", post(handlers::sync::sync_budgets));

    let backup_routes = Router::new()
        .route("/", get(handlers::backup::export_backup))
        .route("/restore", post(handlers::backup::restore_backup));

    let report_routes = Router::new()
        .route("/sales/{id}", get(handlers::reports::sale_pdf))
        .route("/budgets/{id}", get(handlers::reports::budget_pdf));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/customers", customer_routes)
        .nest("/api/products", product_routes)
        .nest("/api/budgets", budget_routes)
        .nest("/api/sales", sale_routes)
        .nest("/api/service-orders", service_order_routes)
        .nest("/api/discards", discard_routes)
        .nest("/api/sync", sync_routes)
        .nest("/api/backup", backup_routes)
        .nest("/api/reports", report_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
