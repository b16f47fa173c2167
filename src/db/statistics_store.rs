//! Aggregate queries behind the statistics page.
//!
//! Each function takes the pool so independent aggregates can run at once.

use crate::db::DbPool;
use crate::error::Result;
use crate::models::filter::DateRange;
use crate::models::order::OrderStatus;
use crate::models::statistics::{CustomerOrderTotals, ShopOrderTotals};

const IN_RANGE: &str = "(?1 IS NULL OR created_at >= ?1) AND (?2 IS NULL OR created_at < ?2)";

pub async fn count_by_status(
    pool: &DbPool,
    table: &str,
    range: DateRange,
) -> Result<Vec<(OrderStatus, i64)>> {
    let sql = format!("SELECT status, COUNT(*) FROM {table} WHERE {IN_RANGE} GROUP BY status");
    let rows = sqlx::query_as::<_, (OrderStatus, i64)>(&sql)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn customer_order_totals(pool: &DbPool, range: DateRange) -> Result<CustomerOrderTotals> {
    let sql = format!(
        "SELECT COUNT(*), COALESCE(SUM(reported_amount), 0), COALESCE(SUM(deposit_amount), 0),
                COALESCE(SUM(remaining_amount), 0), COALESCE(SUM(quantity), 0)
         FROM customer_orders WHERE {IN_RANGE}"
    );
    let (count, reported_amount, deposit_amount, remaining_amount, quantity) =
        sqlx::query_as::<_, (i64, i64, i64, i64, i64)>(&sql)
            .bind(range.start)
            .bind(range.end)
            .fetch_one(pool)
            .await?;
    Ok(CustomerOrderTotals {
        count,
        reported_amount,
        deposit_amount,
        remaining_amount,
        quantity,
    })
}

pub async fn shop_order_totals(pool: &DbPool, range: DateRange) -> Result<ShopOrderTotals> {
    let sql = format!(
        "SELECT COUNT(*), COALESCE(SUM(capital), 0), COALESCE(SUM(profit), 0)
         FROM shop_orders WHERE {IN_RANGE}"
    );
    let (count, capital, profit) = sqlx::query_as::<_, (i64, i64, i64)>(&sql)
        .bind(range.start)
        .bind(range.end)
        .fetch_one(pool)
        .await?;
    Ok(ShopOrderTotals {
        count,
        capital,
        profit,
    })
}

/// Distinct non-empty phone numbers across both order tabs in the range.
pub async fn unique_order_phones(pool: &DbPool, range: DateRange) -> Result<i64> {
    let sql = format!(
        "SELECT COUNT(*) FROM (
            SELECT TRIM(buyer_phone) AS phone FROM customer_orders WHERE {IN_RANGE}
            UNION
            SELECT TRIM(buyer_phone) AS phone FROM shop_orders WHERE {IN_RANGE}
         ) WHERE phone <> ''"
    );
    let (count,) = sqlx::query_as::<_, (i64,)>(&sql)
        .bind(range.start)
        .bind(range.end)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Distinct non-empty phone numbers in the customer directory.
pub async fn unique_directory_phones(pool: &DbPool) -> Result<i64> {
    let (count,) = sqlx::query_as::<_, (i64,)>(
        "SELECT COUNT(DISTINCT TRIM(phone)) FROM customers WHERE TRIM(phone) <> ''",
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Delivered shop orders in the range: how many, and their summed profit.
pub async fn delivered_profit(pool: &DbPool, range: DateRange) -> Result<(i64, i64)> {
    let sql = format!(
        "SELECT COUNT(*), COALESCE(SUM(profit), 0) FROM shop_orders
         WHERE status = ?3 AND {IN_RANGE}"
    );
    let row = sqlx::query_as::<_, (i64, i64)>(&sql)
        .bind(range.start)
        .bind(range.end)
        .bind(OrderStatus::Delivered)
        .fetch_one(pool)
        .await?;
    Ok(row)
}
