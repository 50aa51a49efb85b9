//! Error types for the asset, export, persistence and configuration boundaries.
//!
//! Every error here is recoverable: the editor session that produced it stays
//! usable and the caller decides how to surface it.

use crate::export::ExportFormat;

/// Failure to read or decode a logo bitmap.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read logo asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode logo asset: {0}")]
    Decode(#[from] image::ImageError),
}

/// Failure to produce an export artifact.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("{} export is not yet available", .0.label())]
    Unsupported(ExportFormat),
    #[error("drawing surface unavailable ({width}x{height})")]
    Surface { width: u32, height: u32 },
    #[error("failed to encode {format:?} output: {source}")]
    Encode {
        format: ExportFormat,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to serialize export: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to read or write the persisted branding record.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("branding store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("branding record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to parse a compositor configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid compositor config: {0}")]
    Json(#[from] serde_json::Error),
}
