//! Rasterization backends.
//!
//! A [`Rasterizer`] turns a surface into pixels at a requested output size.
//! It is the only point in an export where the caller yields.

use std::future::Future;

use image::RgbImage;
use image::imageops::{self, FilterType};
use tracing::trace;

use super::types::RasterOptions;
use crate::error::{ExportError, ExportResult};
use crate::surface::Surface;

/// Backend that produces a bitmap of a surface
pub trait Rasterizer: Send + Sync {
    /// Rasterize `surface` into a `width` x `height` bitmap
    fn rasterize(
        &self,
        surface: &dyn Surface,
        width: u32,
        height: u32,
        options: &RasterOptions,
    ) -> impl Future<Output = ExportResult<RgbImage>> + Send;
}

/// Paints the surface at 1x and resamples it to the output size
#[derive(Debug, Clone, Copy)]
pub struct ScalingRasterizer {
    filter: FilterType,
}

impl ScalingRasterizer {
    /// Create a rasterizer with the given resampling filter
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for ScalingRasterizer {
    fn default() -> Self {
        Self::new(FilterType::Lanczos3)
    }
}

impl Rasterizer for ScalingRasterizer {
    async fn rasterize(
        &self,
        surface: &dyn Surface,
        width: u32,
        height: u32,
        options: &RasterOptions,
    ) -> ExportResult<RgbImage> {
        if width == 0 || height == 0 {
            return Err(ExportError::Rasterization(format!(
                "surface '{}' has zero area",
                surface.id()
            )));
        }

        tokio::task::yield_now().await;

        let paint = surface
            .paint()
            .map_err(|e| ExportError::Rasterization(e.to_string()))?;

        if paint.has_foreign_content && !options.include_cross_origin {
            return Err(ExportError::Rasterization(format!(
                "surface '{}' contains cross-origin content",
                surface.id()
            )));
        }
        if paint.pixels.width() == 0 || paint.pixels.height() == 0 {
            return Err(ExportError::Rasterization(format!(
                "surface '{}' painted an empty bitmap",
                surface.id()
            )));
        }

        if paint.pixels.dimensions() == (width, height) {
            return Ok(paint.pixels);
        }

        trace!(
            from_width = paint.pixels.width(),
            from_height = paint.pixels.height(),
            width,
            height,
            "resampling surface"
        );
        Ok(imageops::resize(&paint.pixels, width, height, self.filter))
    }
}
