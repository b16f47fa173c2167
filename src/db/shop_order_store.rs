//! Persistence for the shop/internal order tab.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::db::map_sync_id_conflict;
use crate::db::query::{retain_matching, select_filtered};
use crate::db::tables::{CustomerOrderTable, ShopOrderTable};
use crate::error::Result;
use crate::models::filter::ListFilter;
use crate::models::order::{ShopOrder, ShopOrderDraft};

pub async fn list(conn: &mut SqliteConnection, filter: &ListFilter) -> Result<Vec<ShopOrder>> {
    let mut builder = select_filtered(ShopOrderTable::TABLE_NAME, filter);
    builder.push(" ORDER BY stt ASC, id ASC");
    let mut orders = builder
        .build_query_as::<ShopOrder>()
        .fetch_all(&mut *conn)
        .await?;
    retain_matching(&mut orders, filter.search.as_deref());
    Ok(orders)
}

pub async fn get(conn: &mut SqliteConnection, id: i64) -> Result<Option<ShopOrder>> {
    let order = sqlx::query_as::<_, ShopOrder>("SELECT * FROM shop_orders WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(order)
}

pub async fn find_by_sync_id(
    conn: &mut SqliteConnection,
    sync_id: &str,
) -> Result<Option<ShopOrder>> {
    let order = sqlx::query_as::<_, ShopOrder>("SELECT * FROM shop_orders WHERE sync_id = ?")
        .bind(sync_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(order)
}

/// Legacy counterpart lookup by order code for a customer order.
///
/// Same eligibility rules as the customer-side lookup, mirrored.
pub async fn find_by_order_code(
    conn: &mut SqliteConnection,
    order_code: &str,
    customer_sync_id: Option<&str>,
) -> Result<Option<ShopOrder>> {
    let sql = if customer_sync_id.is_some() {
        format!(
            "SELECT * FROM {t} WHERE TRIM(order_code) = ? AND sync_id IS NULL
             ORDER BY id LIMIT 1",
            t = ShopOrderTable::TABLE_NAME
        )
    } else {
        format!(
            "SELECT * FROM {t} WHERE TRIM(order_code) = ?
               AND (sync_id IS NULL
                    OR NOT EXISTS (SELECT 1 FROM {other} o WHERE o.sync_id = {t}.sync_id))
             ORDER BY (sync_id IS NOT NULL), id LIMIT 1",
            t = ShopOrderTable::TABLE_NAME,
            other = CustomerOrderTable::TABLE_NAME
        )
    };
    let order = sqlx::query_as::<_, ShopOrder>(&sql)
        .bind(order_code.trim())
        .fetch_optional(&mut *conn)
        .await?;
    Ok(order)
}

pub async fn insert(
    conn: &mut SqliteConnection,
    draft: &ShopOrderDraft,
    sync_id: &str,
    created_at: DateTime<Utc>,
) -> Result<ShopOrder> {
    let shared = &draft.shared;
    let order = sqlx::query_as::<_, ShopOrder>(
        r#"
        INSERT INTO shop_orders (
            stt, product_image, buyer_name, buyer_phone, buyer_address, order_code,
            reported_amount, capital, profit, shipping_fee, domestic_shipping_fee,
            status, priority, sync_id, created_at
        )
        VALUES (
            (SELECT COALESCE(MAX(stt), 0) + 1 FROM shop_orders),
            ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
        )
        RETURNING *
        "#,
    )
    .bind(&shared.product_image)
    .bind(&shared.buyer_name)
    .bind(&shared.buyer_phone)
    .bind(&shared.buyer_address)
    .bind(&shared.order_code)
    .bind(shared.reported_amount)
    .bind(draft.capital)
    .bind(draft.profit())
    .bind(shared.shipping_fee)
    .bind(shared.domestic_shipping_fee)
    .bind(shared.status)
    .bind(shared.priority)
    .bind(sync_id)
    .bind(created_at)
    .fetch_one(&mut *conn)
    .await
    .map_err(map_sync_id_conflict)?;
    Ok(order)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    draft: &ShopOrderDraft,
    sync_id: Option<&str>,
) -> Result<Option<ShopOrder>> {
    let shared = &draft.shared;
    let order = sqlx::query_as::<_, ShopOrder>(
        r#"
        UPDATE shop_orders
        SET product_image = ?, buyer_name = ?, buyer_phone = ?, buyer_address = ?,
            order_code = ?, reported_amount = ?, capital = ?, profit = ?,
            shipping_fee = ?, domestic_shipping_fee = ?, status = ?, priority = ?,
            sync_id = COALESCE(sync_id, ?)
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&shared.product_image)
    .bind(&shared.buyer_name)
    .bind(&shared.buyer_phone)
    .bind(&shared.buyer_address)
    .bind(&shared.order_code)
    .bind(shared.reported_amount)
    .bind(draft.capital)
    .bind(draft.profit())
    .bind(shared.shipping_fee)
    .bind(shared.domestic_shipping_fee)
    .bind(shared.status)
    .bind(shared.priority)
    .bind(sync_id)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_sync_id_conflict)?;
    Ok(order)
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM shop_orders WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
