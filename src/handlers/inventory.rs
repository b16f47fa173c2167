use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    handlers::extract::ApiJson,
    error::Result,
    models::{
        filter::ListQuery,
        inventory::{InventoryInput, SellInput},
    },
    state::AppState,
};

pub async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let filter = query.inventory_filter(Utc::now(), state.local_offset)?;
    let items = state.inventory.list(&filter).await?;
    Ok((StatusCode::OK, Json(items)))
}

pub async fn get_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let item = state.inventory.get(id).await?;
    Ok((StatusCode::OK, Json(item)))
}

pub async fn create_inventory_item(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<InventoryInput>,
) -> Result<impl IntoResponse> {
    let item = state.inventory.create(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<InventoryInput>,
) -> Result<impl IntoResponse> {
    let item = state.inventory.update(id, input).await?;
    Ok((StatusCode::OK, Json(item)))
}

pub async fn delete_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.inventory.delete(id).await?;
    Ok((StatusCode::OK, Json(json!({ "deleted": id }))))
}

/// Sell from a stock line into a new order pair
pub async fn sell_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<SellInput>,
) -> Result<impl IntoResponse> {
    let sale = state.inventory.sell(id, input).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}
