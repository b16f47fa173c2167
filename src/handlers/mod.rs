pub mod auth;
pub mod customers;
pub mod extract;
pub mod inventory;
pub mod orders;
pub mod statistics;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::services::upload_service::{MAX_UPLOAD_SIZE, UPLOAD_URL_PREFIX};
use crate::state::AppState;

/// Room for the multipart framing around a maximum-size file.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_SIZE + 64 * 1024;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Build the full HTTP router
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/orders", post(orders::create_order))
        .route("/api/orders/customer", get(orders::list_customer_orders))
        .route("/api/orders/shop", get(orders::list_shop_orders))
        .route("/api/orders/pair/{sync_id}", get(orders::get_pair))
        .route(
            "/api/orders/{side}/{id}",
            put(orders::update_order).delete(orders::delete_order),
        )
        .route(
            "/api/inventory",
            get(inventory::list_inventory).post(inventory::create_inventory_item),
        )
        .route(
            "/api/inventory/{id}",
            get(inventory::get_inventory_item)
                .put(inventory::update_inventory_item)
                .delete(inventory::delete_inventory_item),
        )
        .route("/api/inventory/{id}/sell", post(inventory::sell_inventory_item))
        .route(
            "/api/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route("/api/customers/{id}", put(customers::update_customer))
        .route("/api/statistics", get(statistics::get_statistics))
        .route("/api/charity", get(statistics::get_charity))
        .route(
            "/api/upload",
            post(upload::upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    let public = Router::new()
        .route("/health", get(health))
        .route("/api/auth", get(auth::account_status).post(auth::register))
        .route("/api/auth/login", post(auth::login));

    Router::new()
        .merge(public)
        .merge(protected)
        .nest_service(UPLOAD_URL_PREFIX, ServeDir::new(state.uploads.dir()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
