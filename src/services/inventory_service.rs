use chrono::Utc;

use crate::db::{inventory_store, DbPool};
use crate::error::{AppError, Result};
use crate::models::filter::ListFilter;
use crate::models::inventory::{InventoryInput, InventoryItem, SaleResult, SellInput};
use crate::services::order_sync::{create_pair_in, existing_pair_in, new_sync_id};

#[derive(Clone)]
pub struct InventoryService {
    pool: DbPool,
}

impl InventoryService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &ListFilter) -> Result<Vec<InventoryItem>> {
        let mut conn = self.pool.acquire().await?;
        inventory_store::list(&mut conn, filter).await
    }

    pub async fn get(&self, id: i64) -> Result<InventoryItem> {
        let mut conn = self.pool.acquire().await?;
        inventory_store::get(&mut conn, id)
            .await?
            .ok_or(AppError::NotFound("Inventory item"))
    }

    pub async fn create(&self, input: InventoryInput) -> Result<InventoryItem> {
        let input = input.normalized();
        input.validate()?;

        let mut tx = self.pool.begin().await?;
        let item = inventory_store::insert(&mut tx, &input, &new_sync_id(), Utc::now()).await?;
        tx.commit().await?;

        tracing::info!(inventory_id = item.id, order_code = %item.order_code, "added inventory item");
        Ok(item)
    }

    pub async fn update(&self, id: i64, input: InventoryInput) -> Result<InventoryItem> {
        let input = input.normalized();
        input.validate()?;

        let mut conn = self.pool.acquire().await?;
        inventory_store::update(&mut conn, id, &input)
            .await?
            .ok_or(AppError::NotFound("Inventory item"))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        if !inventory_store::delete(&mut conn, id).await? {
            return Err(AppError::NotFound("Inventory item"));
        }
        tracing::info!(inventory_id = id, "deleted inventory item");
        Ok(())
    }

    /// Sell part of a stock line as a new order pair.
    ///
    /// The pair and the stock decrement commit together. A retried sale with
    /// the same `sync_id` returns the existing pair without touching stock.
    pub async fn sell(&self, id: i64, input: SellInput) -> Result<SaleResult> {
        let mut tx = self.pool.begin().await?;

        let item = inventory_store::get(&mut tx, id)
            .await?
            .ok_or(AppError::NotFound("Inventory item"))?;

        if let Some(sync_id) = &input.sync_id {
            if let Some(pair) = existing_pair_in(&mut tx, sync_id).await? {
                tracing::info!(%sync_id, "sale already recorded");
                return Ok(SaleResult {
                    inventory_item: item,
                    pair,
                });
            }
        }
        input.check_quantity(&item)?;

        let quantity = input.quantity();
        let order = input.into_order_input(&item);
        let outcome = create_pair_in(&mut tx, &order).await?;

        let inventory_item = if outcome.created {
            inventory_store::decrement_quantity(&mut tx, item.id, quantity)
                .await?
                .ok_or_else(|| AppError::validation("Not enough stock left"))?
        } else {
            item
        };
        tx.commit().await?;

        tracing::info!(
            inventory_id = inventory_item.id,
            quantity,
            sync_id = %outcome.pair.sync_id,
            "sold inventory item"
        );
        Ok(SaleResult {
            inventory_item,
            pair: outcome.pair,
        })
    }
}
