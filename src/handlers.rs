pub mod customers;
pub mod products;
pub mod budgets;
pub mod sales;
pub mod service_orders;
pub mod discards;
pub mod sync;
pub mod backup;
pub mod reports;
