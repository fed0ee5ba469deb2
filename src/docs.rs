// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Clientes ---
        handlers::customers::create_customer,
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,

        // --- Produtos ---
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::list_low_stock,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::products::add_stock,

        // --- Orçamentos ---
        handlers::budgets::create_budget,
        handlers::budgets::list_budgets,
        handlers::budgets::get_budget,
        handlers::budgets::update_budget,
        handlers::budgets::delete_budget,
        handlers::budgets::approve_budget,
        handlers::budgets::reject_budget,

        // --- Vendas ---
        handlers::sales::create_sale,
        handlers::sales::list_sales,
        handlers::sales::get_sale,
        handlers::sales::settle_sale,
        handlers::sales::delete_sale,

        // --- Ordens de Serviço ---
        handlers::service_orders::create_service_order,
        handlers::service_orders::list_service_orders,
        handlers::service_orders::get_service_order,
        handlers::service_orders::update_service_order_items,
        handlers::service_orders::transition_service_order,
        handlers::service_orders::delete_service_order,

        // --- Descartes ---
        handlers::discards::create_discard,
        handlers::discards::list_discards,
        handlers::discards::delete_discard,

        // --- Reconciliação ---
        handlers::sync::sync_budgets,

        // --- Backup ---
        handlers::backup::export_backup,
        handlers::backup::restore_backup,

        // --- Relatórios ---
        handlers::reports::sale_pdf,
        handlers::reports::budget_pdf,
    ),
    components(
        schemas(
            // --- Clientes ---
            models::customer::Customer,
            handlers::customers::CustomerPayload,

            // --- Produtos ---
            models::product::ProductKind,
            models::product::Product,
            handlers::products::CreateProductPayload,
            handlers::products::UpdateProductPayload,
            handlers::products::AddStockPayload,

            // --- Orçamentos ---
            models::budget::BudgetStatus,
            models::budget::Budget,
            models::budget::BudgetItem,
            models::budget::BudgetDetail,
            handlers::budgets::BudgetPayload,

            // --- Vendas ---
            models::sale::SaleStatus,
            models::sale::PaymentMethod,
            models::sale::LineItem,
            models::sale::Sale,
            models::sale::SaleItem,
            models::sale::SaleDetail,
            handlers::sales::CreateSalePayload,

            // --- Ordens de Serviço ---
            models::service_order::ServiceOrderStatus,
            models::service_order::ServiceOrder,
            models::service_order::ServiceOrderItem,
            models::service_order::ServiceOrderDetail,
            handlers::service_orders::CreateServiceOrderPayload,
            handlers::service_orders::UpdateServiceOrderItemsPayload,
            handlers::service_orders::TransitionPayload,

            // --- Descartes ---
            models::discard::Discard,
            handlers::discards::CreateDiscardPayload,

            // --- Reconciliação ---
            services::sync_service::SyncReport,

            // --- Backup ---
            models::backup::BackupFile,
            models::backup::BackupLineItem,
            models::backup::CustomerDoc,
            models::backup::ProductDoc,
            models::backup::BudgetDoc,
            models::backup::SaleDoc,
            models::backup::ServiceOrderDoc,
            models::backup::DiscardDoc,
            services::backup_service::RestoreReport,
        )
    ),
    tags(
        (name = "Clientes", description = "Gestão de clientes"),
        (name = "Produtos", description = "Catálogo e estoque"),
        (name = "Orçamentos", description = "Orçamentos e conversão em venda"),
        (name = "Vendas", description = "Vendas e recebimentos"),
        (name = "Ordens de Serviço", description = "Ordens de serviço"),
        (name = "Descartes", description = "Baixas por perda/avaria"),
        (name = "Reconciliação", description = "Varredura de orçamentos aprovados sem venda"),
        (name = "Backup", description = "Exportação e restauração"),
        (name = "Relatórios", description = "Impressão em PDF"),
    )
)]
pub struct ApiDoc;
