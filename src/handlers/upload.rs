use axum::{
    extract::{Json, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::{AppError, Result},
    state::AppState,
};

/// Store the multipart `file` field as a product image
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Failed to read upload: {e}")))?;

        let response = state
            .uploads
            .store(original_name.as_deref(), content_type.as_deref(), &data)
            .await?;
        return Ok((StatusCode::CREATED, Json(response)));
    }

    Err(AppError::validation("No 'file' field found"))
}
