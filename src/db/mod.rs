use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::path::Path;
use std::time::Duration;

pub mod customer_order_store;
pub mod customer_store;
pub mod inventory_store;
pub mod query;
pub mod shop_order_store;
pub mod statistics_store;
pub mod tables;
pub mod user_store;

use tables::{CustomerOrderTable, CustomerTable, InventoryTable, ShopOrderTable, UserTable};

pub type DbPool = Pool<Sqlite>;

/// The order tables' only unique key besides the row id is `sync_id`.
pub fn map_sync_id_conflict(e: sqlx::Error) -> crate::error::AppError {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            crate::error::AppError::SyncIdConflict
        }
        other => crate::error::AppError::Database(other),
    }
}

/// Initialize the database connection pool
pub async fn init_db_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    ensure_parent_dir(database_url).await?;

    // Create the database if it doesn't exist
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        tracing::info!(database_url, "creating database");
        Sqlite::create_database(database_url).await?;
    }

    // Create connection pool
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    setup_database(&pool).await?;

    Ok(pool)
}

/// Make sure the directory holding a file-backed database exists.
async fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

/// Set up the database schema
pub async fn setup_database(pool: &DbPool) -> Result<()> {
    let mut statements = vec![
        CustomerOrderTable::create_table(),
        ShopOrderTable::create_table(),
        InventoryTable::create_table(),
        CustomerTable::create_table(),
        UserTable::create_table(),
    ];
    statements.extend(CustomerOrderTable::create_indexes());
    statements.extend(ShopOrderTable::create_indexes());
    statements.extend(InventoryTable::create_indexes());
    statements.extend(CustomerTable::create_indexes());

    for statement in &statements {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::debug!(statements = statements.len(), "database schema ready");
    Ok(())
}

/// Fresh in-memory database with the schema applied.
///
/// Pinned to one connection that never expires, since every connection to
/// `sqlite::memory:` opens its own empty database.
#[cfg(test)]
pub async fn test_pool() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    setup_database(&pool).await.expect("schema");
    pool
}
