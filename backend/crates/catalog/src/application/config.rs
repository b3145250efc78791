//! Catalog configuration

use std::path::PathBuf;

/// Upload size limit (5 MiB)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image MIME types
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Where uploaded images are written; served under `/uploads`
    pub upload_dir: PathBuf,
    pub max_image_bytes: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./uploads"),
            max_image_bytes: MAX_IMAGE_BYTES,
        }
    }
}

impl CatalogConfig {
    pub fn with_upload_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: dir.into(),
            ..Default::default()
        }
    }
}
