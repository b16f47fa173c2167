pub mod auth_service;
pub mod customer_service;
pub mod inventory_service;
pub mod order_sync;
pub mod statistics_service;
pub mod upload_service;

pub use auth_service::AuthService;
pub use customer_service::CustomerService;
pub use inventory_service::InventoryService;
pub use order_sync::OrderSyncService;
pub use statistics_service::StatisticsService;
pub use upload_service::UploadService;
