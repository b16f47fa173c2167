use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{FixedOffset, TimeDelta, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::Config;
use crate::db::{self, customer_order_store, customer_store, shop_order_store, DbPool};
use crate::error::AppError;
use crate::handlers;
use crate::models::filter::{ListQuery, PeriodQuery};
use crate::models::inventory::{InventoryInput, SellInput};
use crate::models::order::{OrderInput, OrderStatus, Priority, Side};
use crate::services::{InventoryService, OrderSyncService, StatisticsService};
use crate::state::AppState;

fn vn() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).unwrap()
}

fn order(code: &str) -> OrderInput {
    OrderInput {
        buyer_name: "Nguyễn Lan".into(),
        buyer_phone: "0901234567".into(),
        buyer_address: "12 Hàng Bạc, Hà Nội".into(),
        order_code: code.into(),
        quantity: 1,
        reported_amount: 500_000,
        deposit_amount: 100_000,
        shipping_fee: 20_000,
        domestic_shipping_fee: 15_000,
        capital: 300_000,
        ..Default::default()
    }
}

/// Insert a pair the way rows looked before sync ids existed.
async fn legacy_pair(pool: &DbPool, code: &str) -> (i64, i64) {
    let mut conn = pool.acquire().await.unwrap();
    let input = order(code);
    let customer = customer_order_store::insert(&mut conn, &input.customer_draft(), "tmp-c", Utc::now())
        .await
        .unwrap();
    let shop = shop_order_store::insert(&mut conn, &input.shop_draft(), "tmp-s", Utc::now())
        .await
        .unwrap();
    sqlx::query("UPDATE customer_orders SET sync_id = NULL WHERE id = ?")
        .bind(customer.id)
        .execute(&mut *conn)
        .await
        .unwrap();
    sqlx::query("UPDATE shop_orders SET sync_id = NULL WHERE id = ?")
        .bind(shop.id)
        .execute(&mut *conn)
        .await
        .unwrap();
    (customer.id, shop.id)
}

async fn count(pool: &DbPool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

#[cfg(test)]
mod order_sync_tests {
    use super::*;

    #[tokio::test]
    async fn create_links_both_tabs() {
        let pool = db::test_pool().await;
        let orders = OrderSyncService::new(pool.clone());

        let outcome = orders.create_pair(order("VD001")).await.unwrap();
        assert!(outcome.created);
        let pair = outcome.pair;

        assert_eq!(pair.customer_order.sync_id.as_deref(), Some(pair.sync_id.as_str()));
        assert_eq!(pair.shop_order.sync_id.as_deref(), Some(pair.sync_id.as_str()));
        assert_eq!(pair.customer_order.remaining_amount, 420_000);
        assert_eq!(pair.shop_order.capital, 300_000);
        assert_eq!(pair.shop_order.profit, 185_000);
        assert_eq!(pair.customer_order.status, OrderStatus::NotPlaced);
        assert_eq!(pair.shop_order.priority, Priority::Normal);

        // The buyer lands in the customer directory
        let mut conn = pool.acquire().await.unwrap();
        let customers = customer_store::list(&mut conn, None).await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].phone, "0901234567");
    }

    #[tokio::test]
    async fn invalid_create_writes_nothing() {
        let pool = db::test_pool().await;
        let orders = OrderSyncService::new(pool.clone());

        let mut input = order("VD002");
        input.reported_amount = 0;
        assert!(matches!(orders.create_pair(input).await, Err(AppError::Validation(_))));
        assert_eq!(count(&pool, "customer_orders").await, 0);
        assert_eq!(count(&pool, "shop_orders").await, 0);
        assert_eq!(count(&pool, "customers").await, 0);
    }

    #[tokio::test]
    async fn create_with_known_sync_id_is_idempotent() {
        let pool = db::test_pool().await;
        let orders = OrderSyncService::new(pool.clone());

        let mut input = order("VD003");
        input.sync_id = Some("client-generated-1".into());
        let first = orders.create_pair(input.clone()).await.unwrap();
        let retry = orders.create_pair(input).await.unwrap();

        assert!(first.created);
        assert!(!retry.created);
        assert_eq!(first.pair.customer_order.id, retry.pair.customer_order.id);
        assert_eq!(first.pair.shop_order.id, retry.pair.shop_order.id);
        assert_eq!(count(&pool, "customer_orders").await, 1);
        assert_eq!(count(&pool, "shop_orders").await, 1);
    }

    #[tokio::test]
    async fn customer_edit_keeps_shop_capital() {
        let pool = db::test_pool().await;
        let orders = OrderSyncService::new(pool);
        let pair = orders.create_pair(order("VD004")).await.unwrap().pair;

        let mut edit = order("VD004-A");
        edit.buyer_name = "Trần Minh".into();
        edit.status = OrderStatus::Placed;
        edit.priority = Priority::Urgent;
        edit.shipping_fee = 30_000;
        edit.domestic_shipping_fee = 25_000;
        edit.capital = 1; // not the customer tab's field to change
        let updated = orders
            .update_order(Side::Customer, pair.customer_order.id, edit)
            .await
            .unwrap();

        assert_eq!(updated.sync_id, pair.sync_id);
        let shop = updated.shop_order;
        assert_eq!(shop.id, pair.shop_order.id);
        assert_eq!(shop.buyer_name, "Trần Minh");
        assert_eq!(shop.order_code, "VD004-A");
        assert_eq!(shop.status, OrderStatus::Placed);
        assert_eq!(shop.priority, Priority::Urgent);
        assert_eq!(shop.shipping_fee, 30_000);
        assert_eq!(shop.capital, 300_000);
        assert_eq!(shop.profit, 500_000 - (300_000 + 25_000));
        assert_eq!(updated.customer_order.remaining_amount, 430_000);
    }

    #[tokio::test]
    async fn shop_edit_keeps_customer_deposit() {
        let pool = db::test_pool().await;
        let orders = OrderSyncService::new(pool);
        let pair = orders.create_pair(order("VD005")).await.unwrap().pair;

        let mut edit = order("VD005");
        edit.deposit_amount = 0;
        edit.quantity = 9;
        edit.capital = 350_000;
        edit.reported_amount = 600_000;
        edit.status = OrderStatus::Cancelled;
        let updated = orders
            .update_order(Side::Shop, pair.shop_order.id, edit)
            .await
            .unwrap();

        assert_eq!(updated.shop_order.capital, 350_000);
        assert_eq!(updated.shop_order.profit, 0);
        let customer = updated.customer_order;
        assert_eq!(customer.deposit_amount, 100_000);
        assert_eq!(customer.quantity, 1);
        assert_eq!(customer.reported_amount, 600_000);
        assert_eq!(customer.remaining_amount, 520_000);
        assert_eq!(customer.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn legacy_rows_sync_through_order_code() {
        let pool = db::test_pool().await;
        let orders = OrderSyncService::new(pool.clone());
        let (customer_id, shop_id) = legacy_pair(&pool, "VD123").await;

        let mut edit = order("VD123");
        edit.status = OrderStatus::Delivered;
        let updated = orders.update_order(Side::Customer, customer_id, edit).await.unwrap();

        assert_eq!(updated.shop_order.id, shop_id);
        assert_eq!(updated.shop_order.status, OrderStatus::Delivered);
        // Both rows are now linked by a fresh id
        assert_eq!(updated.customer_order.sync_id.as_deref(), Some(updated.sync_id.as_str()));
        assert_eq!(updated.shop_order.sync_id.as_deref(), Some(updated.sync_id.as_str()));
        assert_eq!(count(&pool, "shop_orders").await, 1);
    }

    #[tokio::test]
    async fn editing_an_unpaired_row_creates_its_counterpart() {
        let pool = db::test_pool().await;
        let orders = OrderSyncService::new(pool.clone());
        let (customer_id, shop_id) = legacy_pair(&pool, "VD200").await;
        let mut conn = pool.acquire().await.unwrap();
        shop_order_store::delete(&mut conn, shop_id).await.unwrap();
        drop(conn);

        let mut edit = order("VD200");
        edit.capital = 200_000;
        let updated = orders.update_order(Side::Customer, customer_id, edit).await.unwrap();

        assert_ne!(updated.shop_order.id, shop_id);
        assert_eq!(updated.shop_order.capital, 200_000);
        assert_eq!(updated.shop_order.sync_id.as_deref(), Some(updated.sync_id.as_str()));
    }

    #[tokio::test]
    async fn deleting_one_side_removes_the_legacy_counterpart() {
        let pool = db::test_pool().await;
        let orders = OrderSyncService::new(pool.clone());
        let (_, shop_id) = legacy_pair(&pool, "VD300").await;
        let linked = orders.create_pair(order("VD301")).await.unwrap().pair;

        let deleted = orders.delete_order(Side::Shop, shop_id).await.unwrap();
        assert_eq!(deleted.shop_order_id, Some(shop_id));
        assert!(deleted.customer_order_id.is_some());

        assert_eq!(count(&pool, "customer_orders").await, 1);
        assert_eq!(count(&pool, "shop_orders").await, 1);

        orders
            .delete_order(Side::Customer, linked.customer_order.id)
            .await
            .unwrap();
        assert_eq!(count(&pool, "customer_orders").await, 0);
        assert_eq!(count(&pool, "shop_orders").await, 0);
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let pool = db::test_pool().await;
        let orders = OrderSyncService::new(pool);

        let update = orders.update_order(Side::Shop, 42, order("X")).await;
        assert!(matches!(update, Err(AppError::NotFound(_))));
        let delete = orders.delete_order(Side::Customer, 42).await;
        assert!(matches!(delete, Err(AppError::NotFound(_))));
        assert!(matches!(orders.get_pair("nope").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn deposit_covering_the_total_clears_remaining() {
        let pool = db::test_pool().await;
        let orders = OrderSyncService::new(pool);
        let pair = orders.create_pair(order("VD450")).await.unwrap().pair;
        assert_eq!(pair.customer_order.remaining_amount, 420_000);

        let mut edit = order("VD450");
        edit.deposit_amount = 600_000;
        let updated = orders
            .update_order(Side::Customer, pair.customer_order.id, edit)
            .await
            .unwrap();

        assert_eq!(updated.customer_order.deposit_amount, 600_000);
        assert_eq!(updated.customer_order.remaining_amount, 0);
        assert_eq!(updated.shop_order.profit, pair.shop_order.profit);
    }

    #[tokio::test]
    async fn search_ignores_vietnamese_case() {
        let pool = db::test_pool().await;
        let orders = OrderSyncService::new(pool);
        orders.create_pair(order("VD460")).await.unwrap();
        let now = Utc::now();

        for (search, expected) in [("NGUYỄN", 1), ("nguyễn", 1), ("HÀNG BẠC", 1), ("Trần", 0)] {
            let query = ListQuery {
                search: Some(search.into()),
                ..Default::default()
            };
            let filter = query.order_filter(now, vn()).unwrap();
            let customer = orders.list_customer_orders(&filter).await.unwrap();
            let shop = orders.list_shop_orders(&filter).await.unwrap();
            assert_eq!(customer.len(), expected, "customer tab, search {search}");
            assert_eq!(shop.len(), expected, "shop tab, search {search}");
        }
    }

    #[tokio::test]
    async fn adopting_a_taken_sync_id_is_a_conflict() {
        let pool = db::test_pool().await;
        let orders = OrderSyncService::new(pool.clone());
        let mut linked = order("VD470");
        linked.sync_id = Some("taken".into());
        let linked = orders.create_pair(linked).await.unwrap().pair;
        let (customer_id, _) = legacy_pair(&pool, "VD471").await;

        let mut edit = order("VD471");
        edit.sync_id = Some("taken".into());
        let result = orders.update_order(Side::Customer, customer_id, edit).await;
        assert!(matches!(result, Err(AppError::SyncIdConflict)));

        // The transaction rolled back, the linked pair is untouched
        let view = orders.get_pair("taken").await.unwrap();
        let shop = view.shop_order.unwrap();
        assert_eq!(shop.id, linked.shop_order.id);
        assert_eq!(shop.order_code, "VD470");
        assert_eq!(count(&pool, "customer_orders").await, 2);
    }

    #[tokio::test]
    async fn day_period_only_lists_today() {
        let pool = db::test_pool().await;
        let orders = OrderSyncService::new(pool.clone());
        let now = Utc::now();

        let mut conn = pool.acquire().await.unwrap();
        let input = order("VD400");
        customer_order_store::insert(&mut conn, &input.customer_draft(), "today", now)
            .await
            .unwrap();
        customer_order_store::insert(
            &mut conn,
            &input.customer_draft(),
            "older",
            now - TimeDelta::days(2),
        )
        .await
        .unwrap();
        drop(conn);

        let query = ListQuery {
            period: Some("day".into()),
            ..Default::default()
        };
        let filter = query.order_filter(now, vn()).unwrap();
        let listed = orders.list_customer_orders(&filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].sync_id.as_deref(), Some("today"));

        let all = orders
            .list_customer_orders(&ListQuery::default().order_filter(now, vn()).unwrap())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }
}

#[cfg(test)]
mod inventory_tests {
    use super::*;

    fn stock(quantity: i64) -> InventoryInput {
        InventoryInput {
            order_code: "KHO-77".into(),
            quantity,
            capital: 120_000,
            reported_amount: 250_000,
            shipping_fee: 10_000,
            domestic_shipping_fee: 5_000,
            ..Default::default()
        }
    }

    fn buyer(quantity: i64) -> SellInput {
        SellInput {
            buyer_name: "Phạm Hoa".into(),
            buyer_phone: "0988000111".into(),
            quantity: Some(quantity),
            deposit_amount: 50_000,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn selling_creates_a_pair_and_takes_stock() {
        let pool = db::test_pool().await;
        let inventory = InventoryService::new(pool.clone());
        let item = inventory.create(stock(5)).await.unwrap();
        assert!(item.sync_id.is_some());

        let sale = inventory.sell(item.id, buyer(2)).await.unwrap();
        assert_eq!(sale.inventory_item.quantity, 3);
        assert_eq!(sale.pair.customer_order.quantity, 2);
        assert_eq!(sale.pair.customer_order.order_code, "KHO-77");
        assert_eq!(sale.pair.customer_order.status, OrderStatus::NotPlaced);
        assert_eq!(sale.pair.customer_order.remaining_amount, 210_000);
        assert_eq!(sale.pair.shop_order.capital, 120_000);
        assert_eq!(sale.pair.shop_order.profit, 125_000);
    }

    #[tokio::test]
    async fn overselling_writes_nothing() {
        let pool = db::test_pool().await;
        let inventory = InventoryService::new(pool.clone());
        let item = inventory.create(stock(1)).await.unwrap();

        let sale = inventory.sell(item.id, buyer(2)).await;
        assert!(matches!(sale, Err(AppError::Validation(_))));
        assert_eq!(count(&pool, "customer_orders").await, 0);
        assert_eq!(count(&pool, "shop_orders").await, 0);
        assert_eq!(inventory.get(item.id).await.unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn retried_sale_takes_stock_once() {
        let pool = db::test_pool().await;
        let inventory = InventoryService::new(pool.clone());
        let item = inventory.create(stock(1)).await.unwrap();

        let mut sell = buyer(1);
        sell.sync_id = Some("sale-1".into());
        let first = inventory.sell(item.id, sell.clone()).await.unwrap();
        let retry = inventory.sell(item.id, sell).await.unwrap();

        assert_eq!(first.pair.shop_order.id, retry.pair.shop_order.id);
        assert_eq!(retry.inventory_item.quantity, 0);
        assert_eq!(count(&pool, "shop_orders").await, 1);
    }

    #[tokio::test]
    async fn inventory_crud() {
        let pool = db::test_pool().await;
        let inventory = InventoryService::new(pool);
        let item = inventory.create(stock(2)).await.unwrap();

        let mut edit = stock(7);
        edit.note = "kệ B".into();
        let updated = inventory.update(item.id, edit).await.unwrap();
        assert_eq!(updated.quantity, 7);
        assert_eq!(updated.sync_id, item.sync_id);

        inventory.delete(item.id).await.unwrap();
        assert!(matches!(inventory.get(item.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(inventory.delete(item.id).await, Err(AppError::NotFound(_))));
        assert!(inventory.create(stock(-1)).await.is_err());
    }
}

#[cfg(test)]
mod statistics_tests {
    use super::*;

    #[tokio::test]
    async fn totals_and_charity() {
        let pool = db::test_pool().await;
        let orders = OrderSyncService::new(pool.clone());
        let statistics = StatisticsService::new(pool, vn());

        let mut delivered = order("VD500");
        delivered.status = OrderStatus::Delivered;
        orders.create_pair(delivered).await.unwrap();

        let mut cancelled = order("VD501");
        cancelled.status = OrderStatus::Cancelled;
        cancelled.buyer_name = "Đỗ Quang".into();
        cancelled.buyer_phone = "0911111111".into();
        orders.create_pair(cancelled).await.unwrap();

        let stats = statistics.statistics(&PeriodQuery::default()).await.unwrap();
        assert_eq!(stats.period, "all");
        assert_eq!(stats.customer_orders.count, 2);
        assert_eq!(stats.customer_orders.reported_amount, 1_000_000);
        assert_eq!(stats.customer_orders.remaining_amount, 840_000);
        assert_eq!(stats.shop_orders.capital, 600_000);
        assert_eq!(stats.shop_orders.profit, 185_000);
        assert_eq!(stats.unique_customers, 2);
        let delivered_count = stats
            .shop_orders_by_status
            .iter()
            .find(|c| c.status == OrderStatus::Delivered)
            .unwrap()
            .count;
        assert_eq!(delivered_count, 1);

        let charity = statistics.charity(&PeriodQuery::default()).await.unwrap();
        assert_eq!(charity.period, "month");
        assert_eq!(charity.delivered_orders, 1);
        assert_eq!(charity.total_profit, 185_000);
        assert_eq!(charity.charity_amount, 18_500);
    }

    #[tokio::test]
    async fn day_period_counts_only_today() {
        use chrono::TimeZone;

        let pool = db::test_pool().await;
        let statistics = StatisticsService::new(pool.clone(), vn());
        // 12:00 on 2024-03-10 in UTC+7; the local day is [03-09 17:00, 03-10 17:00) UTC
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 5, 0, 0).unwrap();
        let today_start = Utc.with_ymd_and_hms(2024, 3, 9, 17, 0, 0).unwrap();
        let tomorrow_start = Utc.with_ymd_and_hms(2024, 3, 10, 17, 0, 0).unwrap();

        let mut input = order("VD700");
        input.status = OrderStatus::Delivered;
        let rows = [
            ("today", now),
            ("midnight", today_start),
            ("two-days-ago", now - TimeDelta::days(2)),
            ("tomorrow", tomorrow_start),
        ];
        let mut conn = pool.acquire().await.unwrap();
        for (sync_id, created_at) in rows {
            customer_order_store::insert(&mut conn, &input.customer_draft(), sync_id, created_at)
                .await
                .unwrap();
            shop_order_store::insert(&mut conn, &input.shop_draft(), sync_id, created_at)
                .await
                .unwrap();
        }
        drop(conn);

        let day = PeriodQuery {
            period: Some("day".into()),
            ..Default::default()
        };
        let stats = statistics.statistics_at(&day, now).await.unwrap();
        assert_eq!(stats.period, "day");
        assert_eq!(stats.customer_orders.count, 2);
        assert_eq!(stats.customer_orders.reported_amount, 1_000_000);
        assert_eq!(stats.shop_orders.count, 2);
        assert_eq!(stats.shop_orders.profit, 370_000);

        let charity = statistics.charity_at(&day, now).await.unwrap();
        assert_eq!(charity.delivered_orders, 2);
        assert_eq!(charity.charity_amount, 37_000);

        let all = statistics.statistics_at(&PeriodQuery::default(), now).await.unwrap();
        assert_eq!(all.customer_orders.count, 4);
    }

    #[tokio::test]
    async fn custom_period_outside_the_data_is_empty() {
        let pool = db::test_pool().await;
        let orders = OrderSyncService::new(pool.clone());
        let statistics = StatisticsService::new(pool, vn());
        orders.create_pair(order("VD600")).await.unwrap();

        let query = PeriodQuery {
            period: Some("custom".into()),
            start_date: Some("2001-01-01".into()),
            end_date: Some("2001-01-31".into()),
        };
        let stats = statistics.statistics(&query).await.unwrap();
        assert_eq!(stats.customer_orders.count, 0);
        assert_eq!(stats.shop_orders.profit, 0);
        assert_eq!(stats.unique_customers, 0);
        assert!(stats.customer_orders_by_status.iter().all(|c| c.count == 0));

        let inverted = PeriodQuery {
            period: Some("custom".into()),
            start_date: Some("2001-02-01".into()),
            end_date: Some("2001-01-01".into()),
        };
        assert!(matches!(
            statistics.statistics(&inverted).await,
            Err(AppError::Validation(_))
        ));
    }
}

#[cfg(test)]
mod api_tests {
    use super::*;

    struct TestApp {
        router: Router,
        _uploads: tempfile::TempDir,
    }

    async fn app() -> TestApp {
        let uploads = tempfile::tempdir().unwrap();
        let config = Config {
            server_host: "127.0.0.1".into(),
            server_port: 0,
            database_url: "sqlite::memory:".into(),
            max_pool_size: 1,
            jwt_secret: "test-secret".into(),
            jwt_expiration_hours: 1,
            upload_dir: uploads.path().display().to_string(),
            local_offset: vn(),
        };
        let state = AppState::new(db::test_pool().await, &config);
        TestApp {
            router: handlers::router(state),
            _uploads: uploads,
        }
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn login(router: &Router) -> String {
        let credentials = json!({ "username": "admin", "password": "1234" });
        let (status, _) = send(router, Method::POST, "/api/auth", None, Some(credentials.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = send(router, Method::POST, "/api/auth/login", None, Some(credentials)).await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = app().await;
        let (status, body) = send(&app.router, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn api_requires_a_token() {
        let app = app().await;
        let (status, body) = send(&app.router, Method::GET, "/api/orders/customer", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());

        let (status, _) =
            send(&app.router, Method::GET, "/api/statistics", Some("forged"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn account_is_single_use() {
        let app = app().await;
        let (_, status) = send(&app.router, Method::GET, "/api/auth", None, None).await;
        assert_eq!(status["exists"], false);

        login(&app.router).await;
        let (_, status) = send(&app.router, Method::GET, "/api/auth", None, None).await;
        assert_eq!(status["exists"], true);
        assert_eq!(status["username"], "admin");

        let (code, body) = send(
            &app.router,
            Method::POST,
            "/api/auth",
            None,
            Some(json!({ "username": "intruder", "password": "9999" })),
        )
        .await;
        assert_eq!(code, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("already exists"));

        let (code, _) = send(
            &app.router,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "wrong" })),
        )
        .await;
        assert_eq!(code, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn order_lifecycle_over_http() {
        let app = app().await;
        let token = login(&app.router).await;
        let token = Some(token.as_str());

        let payload = json!({
            "buyer_name": "Lê Vy",
            "buyer_phone": "0977000222",
            "order_code": "VD777",
            "quantity": 1,
            "reported_amount": 300000,
            "capital": 150000,
            "domestic_shipping_fee": 20000,
            "status": "đã lên đơn",
            "remaining_amount": 1,
            "profit": 1
        });
        let (status, pair) =
            send(&app.router, Method::POST, "/api/orders", token, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(pair["shop_order"]["profit"], 130000);
        assert_eq!(pair["customer_order"]["remaining_amount"], 300000);
        assert_eq!(pair["customer_order"]["status"], "placed");
        let sync_id = pair["sync_id"].as_str().unwrap().to_string();
        let customer_id = pair["customer_order"]["id"].as_i64().unwrap();

        let (status, listed) = send(
            &app.router,
            Method::GET,
            "/api/orders/shop?status=placed&search=vd7",
            token,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let mut edit = payload.clone();
        edit["status"] = json!("cancelled");
        let (status, updated) = send(
            &app.router,
            Method::PUT,
            &format!("/api/orders/customer/{customer_id}"),
            token,
            Some(edit),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["shop_order"]["profit"], 0);

        let (status, view) = send(
            &app.router,
            Method::GET,
            &format!("/api/orders/pair/{sync_id}"),
            token,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["shop_order"]["status"], "cancelled");

        let (status, _) = send(
            &app.router,
            Method::DELETE,
            &format!("/api/orders/customer/{customer_id}"),
            token,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app.router,
            Method::GET,
            &format!("/api/orders/pair/{sync_id}"),
            token,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bad_input_is_a_client_error() {
        let app = app().await;
        let token = login(&app.router).await;
        let token = Some(token.as_str());

        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/orders",
            token,
            Some(json!({ "buyer_name": "", "order_code": "A", "reported_amount": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Buyer name is required");

        let (status, _) = send(
            &app.router,
            Method::GET,
            "/api/orders/customer?period=custom&startDate=2024-02-01&endDate=2024-01-01",
            token,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app.router,
            Method::PUT,
            "/api/customers/99",
            token,
            Some(json!({ "name": "Ghost" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/orders",
            token,
            Some(json!({ "buyer_name": "Lan", "order_code": "A", "reported_amount": 1, "status": "shipped" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("shipped"));

        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/inventory",
            token,
            Some(json!({ "order_code": "KHO", "priority": "asap" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/customers")
            .header(header::AUTHORIZATION, format!("Bearer {}", token.unwrap()))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"name\": "))
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn customers_and_statistics_routes() {
        let app = app().await;
        let token = login(&app.router).await;
        let token = Some(token.as_str());

        for name in ["Minh", "An"] {
            let (status, _) = send(
                &app.router,
                Method::POST,
                "/api/customers",
                token,
                Some(json!({ "name": name, "phone": format!("09{name}") })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }
        let (_, customers) = send(&app.router, Method::GET, "/api/customers", token, None).await;
        assert_eq!(customers[0]["name"], "An");
        assert_eq!(customers[1]["name"], "Minh");

        let (status, stats) =
            send(&app.router, Method::GET, "/api/statistics?period=week", token, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["period"], "week");
        assert_eq!(stats["customer_orders"]["count"], 0);

        let (status, charity) = send(&app.router, Method::GET, "/api/charity", token, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(charity["charity_amount"], 0);
    }

    #[tokio::test]
    async fn image_upload_is_served_back() {
        let app = app().await;
        let token = login(&app.router).await;

        let boundary = "lincheng-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"ao.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             PNGDATA\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/upload")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let uploaded: Value = serde_json::from_slice(&bytes).unwrap();
        let url = uploaded["url"].as_str().unwrap();
        assert!(url.starts_with("/uploads/") && url.ends_with(".png"));

        let request = Request::builder().uri(url).body(Body::empty()).unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"PNGDATA");
    }
}
