//! Error types for head metadata and schema generation

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeoError {
    #[error("Required field \"{0}\" is missing.")]
    MissingField(String),

    #[error("Invalid {field}: \"{url}\". Must be a valid URL.")]
    InvalidUrl { field: String, url: String },

    #[error("Canonical URL must be absolute. Received: \"{0}\"")]
    RelativeCanonical(String),

    #[error("Invalid canonical URL: \"{0}\"")]
    InvalidCanonical(String),

    #[error("Breadcrumb item at index {index} is missing required field \"{field}\".")]
    BreadcrumbItemMissing { index: usize, field: &'static str },

    #[error("{0}")]
    InvalidStructure(String),

    #[error("Config file not found at {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Error reading config file {path}: {reason}")]
    ConfigRead { path: String, reason: String },

    #[error("\"{field}\" is required in {file}")]
    MissingConfigField { field: String, file: String },

    #[error("{name} not found at {}", .path.display())]
    HtmlNotFound { name: String, path: PathBuf },

    #[error("Could not find </head> tag in {0}")]
    MissingHeadTag(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
