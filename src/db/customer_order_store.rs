//! Persistence for the customer-facing order tab.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::db::map_sync_id_conflict;
use crate::db::query::{retain_matching, select_filtered};
use crate::db::tables::{CustomerOrderTable, ShopOrderTable};
use crate::error::Result;
use crate::models::filter::ListFilter;
use crate::models::order::{CustomerOrder, CustomerOrderDraft};

pub async fn list(conn: &mut SqliteConnection, filter: &ListFilter) -> Result<Vec<CustomerOrder>> {
    let mut builder = select_filtered(CustomerOrderTable::TABLE_NAME, filter);
    builder.push(" ORDER BY stt ASC, id ASC");
    let mut orders = builder
        .build_query_as::<CustomerOrder>()
        .fetch_all(&mut *conn)
        .await?;
    retain_matching(&mut orders, filter.search.as_deref());
    Ok(orders)
}

pub async fn get(conn: &mut SqliteConnection, id: i64) -> Result<Option<CustomerOrder>> {
    let order = sqlx::query_as::<_, CustomerOrder>("SELECT * FROM customer_orders WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(order)
}

pub async fn find_by_sync_id(
    conn: &mut SqliteConnection,
    sync_id: &str,
) -> Result<Option<CustomerOrder>> {
    let order =
        sqlx::query_as::<_, CustomerOrder>("SELECT * FROM customer_orders WHERE sync_id = ?")
            .bind(sync_id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(order)
}

/// Legacy counterpart lookup by order code for a shop order.
///
/// A shop order that already has a `sync_id` may only claim unlinked rows.
/// One without may also claim rows whose `sync_id` has no shop order.
/// Unlinked rows win, then the lowest id.
pub async fn find_by_order_code(
    conn: &mut SqliteConnection,
    order_code: &str,
    shop_sync_id: Option<&str>,
) -> Result<Option<CustomerOrder>> {
    let sql = if shop_sync_id.is_some() {
        format!(
            "SELECT * FROM {t} WHERE TRIM(order_code) = ? AND sync_id IS NULL
             ORDER BY id LIMIT 1",
            t = CustomerOrderTable::TABLE_NAME
        )
    } else {
        format!(
            "SELECT * FROM {t} WHERE TRIM(order_code) = ?
               AND (sync_id IS NULL
                    OR NOT EXISTS (SELECT 1 FROM {other} o WHERE o.sync_id = {t}.sync_id))
             ORDER BY (sync_id IS NOT NULL), id LIMIT 1",
            t = CustomerOrderTable::TABLE_NAME,
            other = ShopOrderTable::TABLE_NAME
        )
    };
    let order = sqlx::query_as::<_, CustomerOrder>(&sql)
        .bind(order_code.trim())
        .fetch_optional(&mut *conn)
        .await?;
    Ok(order)
}

/// Insert a new row with the next `stt`.
pub async fn insert(
    conn: &mut SqliteConnection,
    draft: &CustomerOrderDraft,
    sync_id: &str,
    created_at: DateTime<Utc>,
) -> Result<CustomerOrder> {
    let shared = &draft.shared;
    let order = sqlx::query_as::<_, CustomerOrder>(
        r#"
        INSERT INTO customer_orders (
            stt, product_image, buyer_name, buyer_phone, buyer_address, order_code,
            quantity, reported_amount, deposit_amount, shipping_fee, domestic_shipping_fee,
            remaining_amount, status, priority, sync_id, created_at
        )
        VALUES (
            (SELECT COALESCE(MAX(stt), 0) + 1 FROM customer_orders),
            ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
        )
        RETURNING *
        "#,
    )
    .bind(&shared.product_image)
    .bind(&shared.buyer_name)
    .bind(&shared.buyer_phone)
    .bind(&shared.buyer_address)
    .bind(&shared.order_code)
    .bind(draft.quantity)
    .bind(shared.reported_amount)
    .bind(draft.deposit_amount)
    .bind(shared.shipping_fee)
    .bind(shared.domestic_shipping_fee)
    .bind(draft.remaining_amount())
    .bind(shared.status)
    .bind(shared.priority)
    .bind(sync_id)
    .bind(created_at)
    .fetch_one(&mut *conn)
    .await
    .map_err(map_sync_id_conflict)?;
    Ok(order)
}

/// Overwrite every editable column; `sync_id` is only set when still empty.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    draft: &CustomerOrderDraft,
    sync_id: Option<&str>,
) -> Result<Option<CustomerOrder>> {
    let shared = &draft.shared;
    let order = sqlx::query_as::<_, CustomerOrder>(
        r#"
        UPDATE customer_orders
        SET product_image = ?, buyer_name = ?, buyer_phone = ?, buyer_address = ?,
            order_code = ?, quantity = ?, reported_amount = ?, deposit_amount = ?,
            shipping_fee = ?, domestic_shipping_fee = ?, remaining_amount = ?,
            status = ?, priority = ?, sync_id = COALESCE(sync_id, ?)
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&shared.product_image)
    .bind(&shared.buyer_name)
    .bind(&shared.buyer_phone)
    .bind(&shared.buyer_address)
    .bind(&shared.order_code)
    .bind(draft.quantity)
    .bind(shared.reported_amount)
    .bind(draft.deposit_amount)
    .bind(shared.shipping_fee)
    .bind(shared.domestic_shipping_fee)
    .bind(draft.remaining_amount())
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
    let result = sqlx::query("DELETE FROM customer_orders WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::error::AppError;
    use crate::models::order::{OrderInput, OrderStatus};

    fn draft(code: &str) -> CustomerOrderDraft {
        OrderInput {
            buyer_name: "Lan".into(),
            order_code: code.into(),
            quantity: 2,
            reported_amount: 500_000,
            shipping_fee: 20_000,
            deposit_amount: 100_000,
            ..Default::default()
        }
        .customer_draft()
    }

    #[tokio::test]
    async fn insert_assigns_increasing_stt_and_remaining() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let first = insert(&mut conn, &draft("A1"), "s-1", Utc::now()).await.unwrap();
        let second = insert(&mut conn, &draft("A2"), "s-2", Utc::now()).await.unwrap();
        assert_eq!(first.stt, 1);
        assert_eq!(second.stt, 2);
        assert_eq!(first.remaining_amount, 420_000);
        assert_eq!(first.status, OrderStatus::NotPlaced);

        // stt follows the current maximum, gaps are not renumbered
        assert!(delete(&mut conn, second.id).await.unwrap());
        let third = insert(&mut conn, &draft("A3"), "s-3", Utc::now()).await.unwrap();
        assert_eq!(third.stt, 2);
        assert!(!delete(&mut conn, second.id).await.unwrap());
    }

    #[tokio::test]
    async fn update_keeps_an_existing_sync_id() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let order = insert(&mut conn, &draft("A1"), "s-1", Utc::now()).await.unwrap();

        let updated = update(&mut conn, order.id, &draft("A1-b"), Some("other"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.sync_id.as_deref(), Some("s-1"));
        assert_eq!(updated.order_code, "A1-b");

        assert!(update(&mut conn, 999, &draft("x"), None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_sync_id_is_rejected() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        insert(&mut conn, &draft("A1"), "s-1", Utc::now()).await.unwrap();
        let taken = insert(&mut conn, &draft("A2"), "s-1", Utc::now()).await;
        assert!(matches!(taken, Err(AppError::SyncIdConflict)));
    }
}
