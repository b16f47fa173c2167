//! Product image storage on the local disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Maximum file size (5MB)
pub const MAX_UPLOAD_SIZE: usize = 5 * 1024 * 1024;

/// Public path prefix the stored files are served under
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub size: usize,
}

#[derive(Clone)]
pub struct UploadService {
    dir: PathBuf,
}

impl UploadService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate and store an uploaded image under a fresh name.
    pub async fn store(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<UploadResponse> {
        let content_type = content_type.unwrap_or_default();
        if !content_type.starts_with("image/") {
            return Err(AppError::validation("Only image files are allowed"));
        }
        if data.is_empty() {
            return Err(AppError::validation("Empty file provided"));
        }
        if data.len() > MAX_UPLOAD_SIZE {
            return Err(AppError::validation(format!(
                "File too large. Maximum size is {}MB",
                MAX_UPLOAD_SIZE / 1024 / 1024
            )));
        }

        let ext = extension(original_name, content_type);
        let filename = format!("{}.{ext}", Uuid::new_v4());

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&filename), data).await?;

        tracing::info!(
            original_name = original_name.unwrap_or_default(),
            %filename,
            size = data.len(),
            "image uploaded"
        );
        Ok(UploadResponse {
            url: format!("{UPLOAD_URL_PREFIX}/{filename}"),
            filename,
            size: data.len(),
        })
    }
}

/// Lowercase alphanumeric extension from the file name, else from the MIME subtype.
fn extension(original_name: Option<&str>, content_type: &str) -> String {
    let from_name = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    if let Some(ext) = from_name {
        return ext;
    }

    let subtype = content_type
        .trim_start_matches("image/")
        .split([';', '+'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match subtype.as_str() {
        "jpeg" => "jpg".to_string(),
        s if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()) => s.to_string(),
        _ => "bin".to_string(),
    }
}
