//! Image Upload Use Case
//!
//! Validates type and size, then writes the file as
//! `<unix-millis>-<sanitized name>` under the upload directory.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use crate::application::config::{ALLOWED_IMAGE_TYPES, CatalogConfig};
use crate::error::{CatalogError, CatalogResult};

/// Public path of a stored image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub file_name: String,
    pub url: String,
}

pub struct StoreImageUseCase {
    config: Arc<CatalogConfig>,
}

impl StoreImageUseCase {
    pub fn new(config: Arc<CatalogConfig>) -> Self {
        Self { config }
    }

    pub fn check_type(content_type: Option<&str>) -> CatalogResult<()> {
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());
        match mime {
            Some(mime) if ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) => Ok(()),
            _ => Err(CatalogError::UnsupportedImageType),
        }
    }

    pub async fn execute(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> CatalogResult<StoredImage> {
        Self::check_type(content_type)?;
        if bytes.len() > self.config.max_image_bytes {
            return Err(CatalogError::ImageTooLarge);
        }

        let file_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(original_name.unwrap_or("image"))
        );
        let path = self.config.upload_dir.join(&file_name);

        write_file(&self.config.upload_dir, &path, bytes).await?;

        tracing::info!(file = %file_name, size = bytes.len(), "Image stored");

        Ok(StoredImage {
            url: format!("/uploads/{file_name}"),
            file_name,
        })
    }
}

async fn write_file(dir: &Path, path: &Path, bytes: &[u8]) -> CatalogResult<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(CatalogError::Storage)?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(CatalogError::Storage)
}

/// Keep `[A-Za-z0-9._-]`, replace everything else with `_`
///
/// Directory components are dropped first so the result never escapes the
/// upload directory.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}
