use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::db::query::{retain_matching, select_filtered};
use crate::db::tables::InventoryTable;
use crate::error::Result;
use crate::models::filter::ListFilter;
use crate::models::inventory::{InventoryInput, InventoryItem};

pub async fn list(conn: &mut SqliteConnection, filter: &ListFilter) -> Result<Vec<InventoryItem>> {
    let mut builder = select_filtered(InventoryTable::TABLE_NAME, filter);
    builder.push(" ORDER BY stt ASC, id ASC");
    let mut items = builder
        .build_query_as::<InventoryItem>()
        .fetch_all(&mut *conn)
        .await?;
    retain_matching(&mut items, filter.search.as_deref());
    Ok(items)
}

pub async fn get(conn: &mut SqliteConnection, id: i64) -> Result<Option<InventoryItem>> {
    let item = sqlx::query_as::<_, InventoryItem>("SELECT * FROM inventory WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(item)
}

pub async fn insert(
    conn: &mut SqliteConnection,
    input: &InventoryInput,
    sync_id: &str,
    created_at: DateTime<Utc>,
) -> Result<InventoryItem> {
    let item = sqlx::query_as::<_, InventoryItem>(
        r#"
        INSERT INTO inventory (
            stt, product_image, order_code, quantity, capital, reported_amount, profit,
            shipping_fee, domestic_shipping_fee, status, priority, note, sync_id, created_at
        )
        VALUES (
            (SELECT COALESCE(MAX(stt), 0) + 1 FROM inventory),
            ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
        )
        RETURNING *
        "#,
    )
    .bind(&input.product_image)
    .bind(&input.order_code)
    .bind(input.quantity)
    .bind(input.capital)
    .bind(input.reported_amount)
    .bind(input.profit())
    .bind(input.shipping_fee)
    .bind(input.domestic_shipping_fee)
    .bind(&input.status)
    .bind(input.priority)
    .bind(&input.note)
    .bind(sync_id)
    .bind(created_at)
    .fetch_one(&mut *conn)
    .await?;
    Ok(item)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    input: &InventoryInput,
) -> Result<Option<InventoryItem>> {
    let item = sqlx::query_as::<_, InventoryItem>(
        r#"
        UPDATE inventory
        SET product_image = ?, order_code = ?, quantity = ?, capital = ?,
            reported_amount = ?, profit = ?, shipping_fee = ?, domestic_shipping_fee = ?,
            status = ?, priority = ?, note = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&input.product_image)
    .bind(&input.order_code)
    .bind(input.quantity)
    .bind(input.capital)
    .bind(input.reported_amount)
    .bind(input.profit())
    .bind(input.shipping_fee)
    .bind(input.domestic_shipping_fee)
    .bind(&input.status)
    .bind(input.priority)
    .bind(&input.note)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(item)
}

/// Take `quantity` units off the line; `None` if it no longer has that many.
pub async fn decrement_quantity(
    conn: &mut SqliteConnection,
    id: i64,
    quantity: i64,
) -> Result<Option<InventoryItem>> {
    let item = sqlx::query_as::<_, InventoryItem>(
        "UPDATE inventory SET quantity = quantity - ? WHERE id = ? AND quantity >= ? RETURNING *",
    )
    .bind(quantity)
    .bind(id)
    .bind(quantity)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(item)
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM inventory WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
