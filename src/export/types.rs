// Request and state types for the export orchestrator

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::capture::validate_scale;
use crate::config;
use crate::error::{ExportError, ExportResult};
use crate::pdf::{Orientation, PageFormat, PageGeometry};

/// Parameters of a single export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    /// Desired file name; `.pdf` is appended when saving
    pub filename: String,

    /// Capture scale factor, must be positive
    pub scale: f64,

    /// Page format of the output
    pub format: PageFormat,

    /// Page orientation of the output
    pub orientation: Orientation,
}

impl ExportRequest {
    /// Request with the configured scale and A4 portrait pages
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            scale: config::scale(),
            format: PageFormat::A4,
            orientation: Orientation::Portrait,
        }
    }

    /// Set the scale factor
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the page orientation
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Page geometry for this request
    pub fn page_geometry(&self) -> PageGeometry {
        PageGeometry::new(self.format, self.orientation)
    }

    /// Check the request's invariants
    pub fn validate(&self) -> ExportResult<()> {
        validate_scale(self.scale)
    }
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self::new(config::default_filename())
    }
}

/// Where an export currently stands
#[derive(Debug, Clone, Default)]
pub enum ExportState {
    /// No export has run yet
    #[default]
    Idle,

    /// An export is running
    InProgress,

    /// The last export saved a file at this path
    Succeeded(PathBuf),

    /// The last export failed and produced no file
    Failed(Arc<ExportError>),
}

impl ExportState {
    /// Whether an export is running
    pub fn is_in_progress(&self) -> bool {
        matches!(self, ExportState::InProgress)
    }

    /// Path of the saved file, if the last export succeeded
    pub fn saved_path(&self) -> Option<&Path> {
        match self {
            ExportState::Succeeded(path) => Some(path),
            _ => None,
        }
    }

    /// Error of the last export, if it failed
    pub fn error(&self) -> Option<&ExportError> {
        match self {
            ExportState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Short label for display
    pub fn label(&self) -> &'static str {
        match self {
            ExportState::Idle => "idle",
            ExportState::InProgress => "exporting",
            ExportState::Succeeded(_) => "succeeded",
            ExportState::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_geometry() {
        let request = ExportRequest::new("cv").orientation(Orientation::Landscape);
        let geometry = request.page_geometry();
        assert_eq!((geometry.width_pts, geometry.height_pts), (842.0, 595.0));
    }

    #[test]
    fn test_request_validate_scale() {
        assert!(ExportRequest::new("cv").scale(2.0).validate().is_ok());
        assert!(matches!(
            ExportRequest::new("cv").scale(0.0).validate(),
            Err(ExportError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_state_accessors() {
        assert_eq!(ExportState::default().label(), "idle");
        assert!(ExportState::InProgress.is_in_progress());

        let done = ExportState::Succeeded(PathBuf::from("cv.pdf"));
        assert_eq!(done.saved_path(), Some(Path::new("cv.pdf")));
        assert!(done.error().is_none());

        let failed = ExportState::Failed(Arc::new(ExportError::Cancelled));
        assert!(matches!(failed.error(), Some(ExportError::Cancelled)));
        assert!(!failed.is_in_progress());
    }
}
