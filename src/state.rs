use chrono::FixedOffset;

use crate::config::Config;
use crate::db::{user_store::UserStore, DbPool};
use crate::services::{
    AuthService, CustomerService, InventoryService, OrderSyncService, StatisticsService, UploadService,
};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub customers: CustomerService,
    pub orders: OrderSyncService,
    pub inventory: InventoryService,
    pub statistics: StatisticsService,
    pub uploads: UploadService,
    pub local_offset: FixedOffset,
}

impl AppState {
    pub fn new(pool: DbPool, config: &Config) -> Self {
        Self {
            auth: AuthService::new(
                UserStore::new(pool.clone()),
                &config.jwt_secret,
                config.jwt_expiration_hours,
            ),
            customers: CustomerService::new(pool.clone()),
            orders: OrderSyncService::new(pool.clone()),
            inventory: InventoryService::new(pool.clone()),
            statistics: StatisticsService::new(pool, config.local_offset),
            uploads: UploadService::new(&config.upload_dir),
            local_offset: config.local_offset,
        }
    }
}
