//! Keeps the two order tabs of a linked pair consistent.
//!
//! A pair is linked by a shared `sync_id`. Rows saved before the id existed
//! are linked by order code instead, which is lossy when codes repeat.
//! Every operation runs in a single transaction together with the customer
//! directory upsert.

use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::db::{customer_order_store, customer_store, shop_order_store, DbPool};
use crate::error::{AppError, Result};
use crate::models::filter::ListFilter;
use crate::models::order::{
    CustomerOrder, DeletedPair, OrderInput, OrderPair, PairView, SharedFields, ShopOrder, Side,
};

pub fn new_sync_id() -> String {
    Uuid::new_v4().to_string()
}

/// Result of a create: the pair, and whether anything was written.
#[derive(Debug)]
pub struct CreateOutcome {
    pub pair: OrderPair,
    pub created: bool,
}

/// The complete pair stored under `sync_id`, if both sides exist.
pub async fn existing_pair_in(
    conn: &mut SqliteConnection,
    sync_id: &str,
) -> Result<Option<OrderPair>> {
    let customer_order = customer_order_store::find_by_sync_id(conn, sync_id).await?;
    let shop_order = shop_order_store::find_by_sync_id(conn, sync_id).await?;
    Ok(match (customer_order, shop_order) {
        (Some(customer_order), Some(shop_order)) => Some(OrderPair {
            sync_id: sync_id.to_string(),
            customer_order,
            shop_order,
        }),
        _ => None,
    })
}

/// Create a linked pair on an open connection or transaction.
///
/// With a caller-supplied `sync_id` the call is idempotent: an existing pair
/// is returned untouched and a half-present one is completed.
pub async fn create_pair_in(conn: &mut SqliteConnection, input: &OrderInput) -> Result<CreateOutcome> {
    input.validate()?;

    let sync_id = match &input.sync_id {
        Some(id) => id.clone(),
        None => new_sync_id(),
    };

    let (existing_customer, existing_shop) = if input.sync_id.is_some() {
        (
            customer_order_store::find_by_sync_id(conn, &sync_id).await?,
            shop_order_store::find_by_sync_id(conn, &sync_id).await?,
        )
    } else {
        (None, None)
    };

    if let (Some(customer_order), Some(shop_order)) = (&existing_customer, &existing_shop) {
        tracing::info!(%sync_id, "order pair already exists, create ignored");
        return Ok(CreateOutcome {
            pair: OrderPair {
                sync_id,
                customer_order: customer_order.clone(),
                shop_order: shop_order.clone(),
            },
            created: false,
        });
    }

    let now = Utc::now();
    let customer_order = match existing_customer {
        Some(order) => order,
        None => {
            customer_order_store::insert(conn, &input.customer_draft(), &sync_id, now).await?
        }
    };
    let shop_order = match existing_shop {
        Some(order) => order,
        None => shop_order_store::insert(conn, &input.shop_draft(), &sync_id, now).await?,
    };

    customer_store::upsert_from_buyer(
        conn,
        &input.buyer_name,
        &input.buyer_phone,
        &input.buyer_address,
    )
    .await?;

    tracing::info!(
        %sync_id,
        customer_order_id = customer_order.id,
        shop_order_id = shop_order.id,
        "created order pair"
    );

    Ok(CreateOutcome {
        pair: OrderPair {
            sync_id,
            customer_order,
            shop_order,
        },
        created: true,
    })
}

/// Find the shop order paired with a customer order.
async fn shop_counterpart(
    conn: &mut SqliteConnection,
    order: &CustomerOrder,
    sync_id: Option<&str>,
) -> Result<Option<ShopOrder>> {
    if let Some(id) = sync_id {
        if let Some(found) = shop_order_store::find_by_sync_id(conn, id).await? {
            return Ok(Some(found));
        }
    }
    let found = shop_order_store::find_by_order_code(conn, &order.order_code, sync_id).await?;
    if let Some(found) = &found {
        tracing::debug!(
            order_code = %order.order_code,
            shop_order_id = found.id,
            "matched shop order by order code"
        );
    }
    Ok(found)
}

/// Find the customer order paired with a shop order.
async fn customer_counterpart(
    conn: &mut SqliteConnection,
    order: &ShopOrder,
    sync_id: Option<&str>,
) -> Result<Option<CustomerOrder>> {
    if let Some(id) = sync_id {
        if let Some(found) = customer_order_store::find_by_sync_id(conn, id).await? {
            return Ok(Some(found));
        }
    }
    let found =
        customer_order_store::find_by_order_code(conn, &order.order_code, sync_id).await?;
    if let Some(found) = &found {
        tracing::debug!(
            order_code = %order.order_code,
            customer_order_id = found.id,
            "matched customer order by order code"
        );
    }
    Ok(found)
}

async fn update_customer_side(
    conn: &mut SqliteConnection,
    id: i64,
    input: &OrderInput,
) -> Result<OrderPair> {
    let current = customer_order_store::get(conn, id)
        .await?
        .ok_or(AppError::NotFound("Customer order"))?;

    let resolved = current.sync_id.clone().or_else(|| input.sync_id.clone());
    let counterpart = shop_counterpart(conn, &current, resolved.as_deref()).await?;
    let sync_id = resolved
        .or_else(|| counterpart.as_ref().and_then(|o| o.sync_id.clone()))
        .unwrap_or_else(new_sync_id);

    let customer_order =
        customer_order_store::update(conn, id, &input.customer_draft(), Some(&sync_id))
            .await?
            .ok_or(AppError::NotFound("Customer order"))?;

    let shared = SharedFields::from(input);
    let shop_order = match counterpart {
        Some(shop) => {
            shop_order_store::update(conn, shop.id, &shop.with_shared(shared), Some(&sync_id))
                .await?
                .ok_or(AppError::NotFound("Shop order"))?
        }
        None => {
            tracing::info!(%sync_id, "creating missing shop order for pair");
            shop_order_store::insert(conn, &input.shop_draft(), &sync_id, Utc::now()).await?
        }
    };

    Ok(OrderPair {
        sync_id,
        customer_order,
        shop_order,
    })
}

async fn update_shop_side(
    conn: &mut SqliteConnection,
    id: i64,
    input: &OrderInput,
) -> Result<OrderPair> {
    let current = shop_order_store::get(conn, id)
        .await?
        .ok_or(AppError::NotFound("Shop order"))?;

    let resolved = current.sync_id.clone().or_else(|| input.sync_id.clone());
    let counterpart = customer_counterpart(conn, &current, resolved.as_deref()).await?;
    let sync_id = resolved
        .or_else(|| counterpart.as_ref().and_then(|o| o.sync_id.clone()))
        .unwrap_or_else(new_sync_id);

    let shop_order = shop_order_store::update(conn, id, &input.shop_draft(), Some(&sync_id))
        .await?
        .ok_or(AppError::NotFound("Shop order"))?;

    let shared = SharedFields::from(input);
    let customer_order = match counterpart {
        Some(customer) => customer_order_store::update(
            conn,
            customer.id,
            &customer.with_shared(shared),
            Some(&sync_id),
        )
        .await?
        .ok_or(AppError::NotFound("Customer order"))?,
        None => {
            tracing::info!(%sync_id, "creating missing customer order for pair");
            customer_order_store::insert(conn, &input.customer_draft(), &sync_id, Utc::now())
                .await?
        }
    };

    Ok(OrderPair {
        sync_id,
        customer_order,
        shop_order,
    })
}

/// Order operations across both tabs.
#[derive(Clone)]
pub struct OrderSyncService {
    pool: DbPool,
}

impl OrderSyncService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list_customer_orders(&self, filter: &ListFilter) -> Result<Vec<CustomerOrder>> {
        let mut conn = self.pool.acquire().await?;
        customer_order_store::list(&mut conn, filter).await
    }

    pub async fn list_shop_orders(&self, filter: &ListFilter) -> Result<Vec<ShopOrder>> {
        let mut conn = self.pool.acquire().await?;
        shop_order_store::list(&mut conn, filter).await
    }

    /// Both sides of a pair; `NotFound` when neither exists.
    pub async fn get_pair(&self, sync_id: &str) -> Result<PairView> {
        let mut conn = self.pool.acquire().await?;
        let customer_order = customer_order_store::find_by_sync_id(&mut conn, sync_id).await?;
        let shop_order = shop_order_store::find_by_sync_id(&mut conn, sync_id).await?;
        if customer_order.is_none() && shop_order.is_none() {
            return Err(AppError::NotFound("Order pair"));
        }
        Ok(PairView {
            sync_id: sync_id.to_string(),
            customer_order,
            shop_order,
        })
    }

    pub async fn create_pair(&self, input: OrderInput) -> Result<CreateOutcome> {
        let input = input.normalized();
        let mut tx = self.pool.begin().await?;
        let outcome = create_pair_in(&mut tx, &input).await?;
        tx.commit().await?;
        Ok(outcome)
    }

    /// Save one side fully and push the shared fields to its counterpart,
    /// creating the counterpart when none can be found.
    pub async fn update_order(&self, side: Side, id: i64, input: OrderInput) -> Result<OrderPair> {
        let input = input.normalized();
        input.validate()?;

        let mut tx = self.pool.begin().await?;
        let pair = match side {
            Side::Customer => update_customer_side(&mut tx, id, &input).await?,
            Side::Shop => update_shop_side(&mut tx, id, &input).await?,
        };
        customer_store::upsert_from_buyer(
            &mut tx,
            &input.buyer_name,
            &input.buyer_phone,
            &input.buyer_address,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(sync_id = %pair.sync_id, ?side, id, "updated order pair");
        Ok(pair)
    }

    /// Delete one side and whatever counterpart can be found.
    pub async fn delete_order(&self, side: Side, id: i64) -> Result<DeletedPair> {
        let mut tx = self.pool.begin().await?;
        let deleted = match side {
            Side::Customer => {
                let order = customer_order_store::get(&mut tx, id)
                    .await?
                    .ok_or(AppError::NotFound("Customer order"))?;
                let counterpart = shop_counterpart(&mut tx, &order, order.sync_id.as_deref()).await?;
                customer_order_store::delete(&mut tx, order.id).await?;
                if let Some(shop) = &counterpart {
                    shop_order_store::delete(&mut tx, shop.id).await?;
                }
                DeletedPair {
                    customer_order_id: Some(order.id),
                    shop_order_id: counterpart.map(|o| o.id),
                }
            }
            Side::Shop => {
                let order = shop_order_store::get(&mut tx, id)
                    .await?
                    .ok_or(AppError::NotFound("Shop order"))?;
                let counterpart =
                    customer_counterpart(&mut tx, &order, order.sync_id.as_deref()).await?;
                shop_order_store::delete(&mut tx, order.id).await?;
                if let Some(customer) = &counterpart {
                    customer_order_store::delete(&mut tx, customer.id).await?;
                }
                DeletedPair {
                    customer_order_id: counterpart.map(|o| o.id),
                    shop_order_id: Some(order.id),
                }
            }
        };
        tx.commit().await?;

        tracing::info!(?side, id, ?deleted, "deleted order pair");
        Ok(deleted)
    }
}
