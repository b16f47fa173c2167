use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::Result,
    handlers::extract::ApiJson,
    models::customer::{CustomerInput, CustomerQuery},
    state::AppState,
};

pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> Result<impl IntoResponse> {
    let customers = state.customers.list(query.search.as_deref()).await?;
    Ok((StatusCode::OK, Json(customers)))
}

pub async fn create_customer(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CustomerInput>,
) -> Result<impl IntoResponse> {
    let customer = state.customers.create(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<CustomerInput>,
) -> Result<impl IntoResponse> {
    let customer = state.customers.update(id, input).await?;
    Ok((StatusCode::OK, Json(customer)))
}
