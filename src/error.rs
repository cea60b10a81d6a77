//! Error types for folio_preload

use crate::registry::AssetCategory;
use thiserror::Error;

/// Main error type for preload operations
#[derive(Error, Debug)]
pub enum PreloadError {
    #[error("Unknown asset: {category}/{key}")]
    UnknownAsset { category: AssetCategory, key: String },

    #[error("Failed to load {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    #[error("Preloading has already been started")]
    AlreadyStarted,

    #[error("Invalid registry: {0}")]
    InvalidRegistry(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Preference error: {0}")]
    Preference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("GLTF error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PreloadError {
    /// Build a `LoadFailed` error for a path
    pub fn load_failed(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::LoadFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for preload operations
pub type Result<T> = std::result::Result<T, PreloadError>;
