use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{error::Result, models::filter::PeriodQuery, state::AppState};

pub async fn get_statistics(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse> {
    let statistics = state.statistics.statistics(&query).await?;
    Ok((StatusCode::OK, Json(statistics)))
}

pub async fn get_charity(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse> {
    let report = state.statistics.charity(&query).await?;
    Ok((StatusCode::OK, Json(report)))
}
