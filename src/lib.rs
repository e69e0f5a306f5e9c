//! Résumé Export - capture a rendered résumé and package it as a PDF.
//!
//! This crate provides:
//! - Surfaces: renderable regions, with an in-memory `Framebuffer`
//! - Snapshot capture at a scale factor through a pluggable rasterizer
//! - Single-page PDF packaging with aspect-preserving, top-anchored placement
//! - An export orchestrator with an observable four-state status
//! - Résumé data, local JSON persistence and three visual templates
//!
//! # Example
//!
//! ```rust,no_run
//! use resume_export::{ExportRequest, Exporter, ResumeStore, render};
//!
//! # async fn run() {
//! let data = ResumeStore::new("resume-storage.json").load().unwrap();
//! let preview = render(&data);
//!
//! let exporter = Exporter::to_dir("./downloads");
//! let request = ExportRequest::new(data.export_filename("resume"));
//! if let Some(path) = exporter.export(&preview, &request).await {
//!     println!("saved {}", path.display());
//! }
//! # }
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod export;
pub mod pdf;
pub mod resume;
pub mod surface;

// Re-export error types
pub use error::{ExportError, ExportResult};

// Re-export capture types
pub use capture::{Capturer, RasterOptions, Rasterizer, ScalingRasterizer, Snapshot};

// Re-export packaging types
pub use pdf::{Orientation, PageFormat, PageGeometry, PdfDocument, PlacedImage, package};

// Re-export orchestration types
pub use export::{DownloadDir, ExportRequest, ExportState, ExportStatus, Exporter};

// Re-export surfaces
pub use surface::{Framebuffer, Surface, SurfaceLayout, SurfaceRegistry};

// Re-export résumé data and templates
pub use resume::{ResumeData, ResumeStore, TemplateKind, render, render_with};
