// src/config.rs

use crate::{
    db::{
        BudgetRepository, CustomerRepository, DiscardRepository, ProductRepository, SaleRepository,
        ServiceOrderRepository,
    },
    services::{
        backup_service::BackupService, budget_service::BudgetService,
        conversion_service::ConversionService, discard_service::DiscardService,
        product_service::ProductService, report_service::ReportService, sale_service::SaleService,
        service_order_service::ServiceOrderService, sync_service::SyncService,
    },
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

// Identidade da empresa para cabeçalhos de relatório. Configuração explícita
// carregada do ambiente e passada adiante; nada de estado global.
#[derive(Clone)]
pub struct CompanyConfig {
    pub name: String,
    pub document: Option<String>,
    pub address: Option<String>,
    pub pix_key: Option<String>,
}

impl CompanyConfig {
    fn from_env() -> Self {
        Self {
            name: env::var("COMPANY_NAME").unwrap_or_else(|_| "GESTOR PME".to_string()),
            document: env::var("COMPANY_DOCUMENT").ok(),
            address: env::var("COMPANY_ADDRESS").ok(),
            pix_key: env::var("COMPANY_PIX_KEY").ok(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub customer_repo: CustomerRepository,
    pub product_service: ProductService,
    pub budget_service: BudgetService,
    pub sale_service: SaleService,
    pub service_order_service: ServiceOrderService,
    pub discard_service: DiscardService,
    pub sync_service: SyncService,
    pub backup_service: BackupService,
    pub report_service: ReportService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let company = CompanyConfig::from_env();

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let budget_repo = BudgetRepository::new(db_pool.clone());
        let sale_repo = SaleRepository::new(db_pool.clone());
        let order_repo = ServiceOrderRepository::new(db_pool.clone());
        let discard_repo = DiscardRepository::new(db_pool.clone());

        let conversion_service = ConversionService::new(
            product_repo.clone(),
            sale_repo.clone(),
            budget_repo.clone(),
            customer_repo.clone(),
        );
        let product_service = ProductService::new(product_repo.clone());
        let budget_service = BudgetService::new(
            budget_repo.clone(),
            customer_repo.clone(),
            product_repo.clone(),
            conversion_service.clone(),
        );
        let sale_service = SaleService::new(
            sale_repo.clone(),
            customer_repo.clone(),
            product_repo.clone(),
            conversion_service.clone(),
        );
        let service_order_service = ServiceOrderService::new(
            order_repo.clone(),
            customer_repo.clone(),
            product_repo.clone(),
        );
        let discard_service = DiscardService::new(discard_repo, product_repo.clone());
        let sync_service = SyncService::new(
            budget_repo.clone(),
            sale_repo.clone(),
            product_repo.clone(),
            conversion_service,
        );
        let backup_service = BackupService::new();
        let report_service = ReportService::new(
            sale_repo,
            budget_repo,
            customer_repo.clone(),
            product_repo,
            company,
        );

        Ok(Self {
            db_pool,
            customer_repo,
            product_service,
            budget_service,
            sale_service,
            service_order_service,
            discard_service,
            sync_service,
            backup_service,
            report_service,
        })
    }
}
