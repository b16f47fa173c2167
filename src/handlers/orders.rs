use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::{
    handlers::extract::ApiJson,
    error::Result,
    models::{
        filter::ListQuery,
        order::{OrderInput, Side},
    },
    state::AppState,
};

pub async fn list_customer_orders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let filter = query.order_filter(Utc::now(), state.local_offset)?;
    let orders = state.orders.list_customer_orders(&filter).await?;
    Ok((StatusCode::OK, Json(orders)))
}

pub async fn list_shop_orders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let filter = query.order_filter(Utc::now(), state.local_offset)?;
    let orders = state.orders.list_shop_orders(&filter).await?;
    Ok((StatusCode::OK, Json(orders)))
}

pub async fn get_pair(
    State(state): State<AppState>,
    Path(sync_id): Path<String>,
) -> Result<impl IntoResponse> {
    let pair = state.orders.get_pair(&sync_id).await?;
    Ok((StatusCode::OK, Json(pair)))
}

/// Create both tabs of a new order; a replayed `sync_id` answers 200 instead of 201
pub async fn create_order(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<OrderInput>,
) -> Result<impl IntoResponse> {
    let outcome = state.orders.create_pair(input).await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome.pair)))
}

pub async fn update_order(
    State(state): State<AppState>,
    Path((side, id)): Path<(Side, i64)>,
    ApiJson(input): ApiJson<OrderInput>,
) -> Result<impl IntoResponse> {
    let pair = state.orders.update_order(side, id, input).await?;
    Ok((StatusCode::OK, Json(pair)))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path((side, id)): Path<(Side, i64)>,
) -> Result<impl IntoResponse> {
    let deleted = state.orders.delete_order(side, id).await?;
    Ok((StatusCode::OK, Json(deleted)))
}
