//! Error types for the export pipeline

use thiserror::Error;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while capturing, packaging or saving an export
#[derive(Error, Debug)]
pub enum ExportError {
    /// No mounted, laid-out surface matches the identifier
    #[error("Surface '{0}' not found")]
    SurfaceNotFound(String),

    /// The rasterization backend failed to produce a bitmap
    #[error("Rasterization failed: {0}")]
    Rasterization(String),

    /// The snapshot could not be encoded or embedded
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// The export request itself is malformed (e.g. non-positive scale)
    #[error("Invalid export request: {0}")]
    InvalidRequest(String),

    /// The export was dropped before it completed
    #[error("Export cancelled before completion")]
    Cancelled,

    /// Writing the finished document failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ExportError::SurfaceNotFound(_) => "surface_not_found",
            ExportError::Rasterization(_) => "rasterization",
            ExportError::Encoding(_) => "encoding",
            ExportError::InvalidRequest(_) => "invalid_request",
            ExportError::Cancelled => "cancelled",
            ExportError::Io(_) => "io",
        }
    }
}

impl From<image::ImageError> for ExportError {
    fn from(err: image::ImageError) -> Self {
        ExportError::Encoding(err.to_string())
    }
}
