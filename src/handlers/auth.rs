use axum::{
    extract::{Json, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    handlers::extract::ApiJson,
    error::{AppError, Result},
    models::user::Credentials,
    state::AppState,
};

/// Handler reporting whether the account has been set up
pub async fn account_status(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let status = state.auth.status().await?;
    Ok((StatusCode::OK, Json(status)))
}

/// Handler for first-time account registration
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<Credentials>,
) -> Result<impl IntoResponse> {
    let status = state.auth.register(&request).await?;
    Ok((StatusCode::CREATED, Json(status)))
}

/// Handler for username/password login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<Credentials>,
) -> Result<impl IntoResponse> {
    let response = state.auth.login(&request).await?;
    Ok((StatusCode::OK, Json(response)))
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Reject requests without a valid session token
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> std::result::Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| AppError::Auth("Missing or malformed Authorization header".into()))?;

    let claims = state.auth.validate_token(token)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
