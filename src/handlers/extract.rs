//! Request extractors that reject with `AppError`.

use axum::extract::{FromRequest, Json, Request, rejection::JsonRejection};

use crate::error::AppError;

/// `Json` body whose rejections become a 400 with the usual `{error}` body
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
