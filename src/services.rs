pub mod stock;
pub mod conversion_service;
pub mod sync_service;
pub mod budget_service;
pub mod sale_service;
pub mod service_order_service;
pub mod product_service;
pub mod discard_service;
pub mod backup_service;
pub mod report_service;
