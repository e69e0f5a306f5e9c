//! Export orchestration.
//!
//! [`Exporter::export`] runs capture, packaging and file emission in
//! sequence. Failures never escape: they are logged, recorded in the
//! caller's [`ExportStatus`], and the call returns `None` with no file
//! written.

pub mod download;
pub mod status;
pub mod types;

pub use download::{DownloadDir, file_stem};
pub use status::ExportStatus;
pub use types::{ExportRequest, ExportState};

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::capture::{Capturer, Rasterizer, ScalingRasterizer};
use crate::error::ExportResult;
use crate::pdf::package;
use crate::surface::{Surface, SurfaceRegistry};

/// Runs exports against surfaces and reports through an [`ExportStatus`]
#[derive(Debug)]
pub struct Exporter<R = ScalingRasterizer> {
    capturer: Capturer<R>,
    downloads: DownloadDir,
    status: ExportStatus,
}

impl<R: Rasterizer> Exporter<R> {
    /// Create an exporter with its own status
    pub fn new(capturer: Capturer<R>, downloads: DownloadDir) -> Self {
        Self {
            capturer,
            downloads,
            status: ExportStatus::new(),
        }
    }

    /// Report through a status owned by the caller
    pub fn with_status(mut self, status: ExportStatus) -> Self {
        self.status = status;
        self
    }

    /// Status of this exporter's exports
    pub fn status(&self) -> &ExportStatus {
        &self.status
    }

    /// Where finished documents are saved
    pub fn downloads(&self) -> &DownloadDir {
        &self.downloads
    }

    /// Export `surface` as a PDF, returning the saved path on success
    ///
    /// Returns `None` without touching the status when another export is
    /// already running.
    pub async fn export(&self, surface: &dyn Surface, request: &ExportRequest) -> Option<PathBuf> {
        self.drive(surface.id(), self.run(surface, request)).await
    }

    /// Export the surface registered under `id`
    pub async fn export_by_id(
        &self,
        registry: &SurfaceRegistry,
        id: &str,
        request: &ExportRequest,
    ) -> Option<PathBuf> {
        self.drive(id, self.run_by_id(registry, id, request)).await
    }

    async fn drive<F>(&self, surface_id: &str, work: F) -> Option<PathBuf>
    where
        F: Future<Output = ExportResult<PathBuf>>,
    {
        let Some(in_flight) = self.status.begin() else {
            warn!(surface = surface_id, "export already in progress, ignoring request");
            return None;
        };

        match work.await {
            Ok(path) => {
                info!(surface = surface_id, path = %path.display(), "export finished");
                in_flight.finish(ExportState::Succeeded(path.clone()));
                Some(path)
            }
            Err(err) => {
                error!(surface = surface_id, kind = err.kind(), error = %err, "export failed");
                in_flight.finish(ExportState::Failed(Arc::new(err)));
                None
            }
        }
    }

    async fn run_by_id(
        &self,
        registry: &SurfaceRegistry,
        id: &str,
        request: &ExportRequest,
    ) -> ExportResult<PathBuf> {
        let surface = registry.resolve(id)?;
        self.run(surface.as_ref(), request).await
    }

    async fn run(&self, surface: &dyn Surface, request: &ExportRequest) -> ExportResult<PathBuf> {
        request.validate()?;
        let snapshot = self.capturer.capture(surface, request.scale).await?;
        let document = package(&snapshot, &request.page_geometry())?;
        self.downloads.save(&document, &request.filename)
    }
}

impl Exporter<ScalingRasterizer> {
    /// Exporter with the default rasterizer saving into `dir`
    pub fn to_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(Capturer::scaling(), DownloadDir::new(dir))
    }
}
