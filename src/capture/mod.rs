//! Document snapshot capture.
//!
//! [`Capturer::capture`] resolves a surface's laid-out size, multiplies it by
//! the scale factor, rasterizes the surface through a [`Rasterizer`] and
//! encodes the result as a JPEG [`Snapshot`].

pub mod rasterizer;
pub mod types;

pub use rasterizer::{Rasterizer, ScalingRasterizer};
pub use types::{MAX_JPEG_QUALITY, RasterOptions, Snapshot};

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, RgbImage};
use tracing::debug;

use crate::error::{ExportError, ExportResult};
use crate::surface::{Surface, SurfaceLayout};

/// Largest output side the JPEG encoder accepts
pub const MAX_OUTPUT_SIDE: u32 = 65_535;

/// Largest output bitmap, in pixels (about 192 MiB of RGB)
pub const MAX_OUTPUT_PIXELS: u64 = 64 * 1024 * 1024;

/// Captures surfaces into JPEG snapshots
#[derive(Debug, Clone)]
pub struct Capturer<R = ScalingRasterizer> {
    rasterizer: R,
    options: RasterOptions,
}

impl<R: Rasterizer> Capturer<R> {
    /// Create a capturer backed by the given rasterizer
    pub fn new(rasterizer: R) -> Self {
        Self {
            rasterizer,
            options: RasterOptions::default(),
        }
    }

    /// Replace the raster options
    pub fn with_options(mut self, options: RasterOptions) -> Self {
        self.options = options;
        self
    }

    /// Current raster options
    pub fn options(&self) -> &RasterOptions {
        &self.options
    }

    /// Capture the current visual state of `surface` at `scale`
    ///
    /// The caller must make sure layout has settled; the surface is read
    /// exactly once, at the moment of the call.
    pub async fn capture(&self, surface: &dyn Surface, scale: f64) -> ExportResult<Snapshot> {
        validate_scale(scale)?;

        let layout = surface
            .layout()
            .ok_or_else(|| ExportError::SurfaceNotFound(surface.id().to_string()))?;
        if layout.is_empty() {
            return Err(ExportError::Rasterization(format!(
                "surface '{}' has zero area ({}x{})",
                surface.id(),
                layout.width,
                layout.height
            )));
        }

        let (width, height) = output_size(surface.id(), layout, scale)?;
        debug!(
            surface = surface.id(),
            layout_width = layout.width,
            layout_height = layout.height,
            scale,
            width,
            height,
            "capturing surface"
        );

        let image = self
            .rasterizer
            .rasterize(surface, width, height, &self.options)
            .await?;
        let image_data = encode_jpeg(&image, self.options.jpeg_quality)?;

        Ok(Snapshot::new(image.width(), image.height(), image_data, surface.id()))
    }
}

impl Capturer<ScalingRasterizer> {
    /// Capturer using the default resampling rasterizer
    pub fn scaling() -> Self {
        Self::new(ScalingRasterizer::default())
    }
}

impl Default for Capturer<ScalingRasterizer> {
    fn default() -> Self {
        Self::scaling()
    }
}

/// Output size of `layout` at `scale`, refusing bitmaps too large to encode
fn output_size(id: &str, layout: SurfaceLayout, scale: f64) -> ExportResult<(u32, u32)> {
    let too_large = || {
        ExportError::Rasterization(format!(
            "surface '{}' ({}x{}) at scale {} exceeds the output limit of {} px per side and {} px total",
            id, layout.width, layout.height, scale, MAX_OUTPUT_SIDE, MAX_OUTPUT_PIXELS
        ))
    };

    let (width, height) = layout.scaled(scale).ok_or_else(too_large)?;
    if width > MAX_OUTPUT_SIDE
        || height > MAX_OUTPUT_SIDE
        || u64::from(width) * u64::from(height) > MAX_OUTPUT_PIXELS
    {
        return Err(too_large());
    }
    Ok((width, height))
}

/// Reject scale factors that are not finite and positive
pub fn validate_scale(scale: f64) -> ExportResult<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(ExportError::InvalidRequest(format!(
            "scale must be a positive number, got {}",
            scale
        )))
    }
}

/// Encode an RGB bitmap as JPEG
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> ExportResult<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, MAX_JPEG_QUALITY));
    encoder
        .encode(image.as_raw(), image.width(), image.height(), ColorType::Rgb8)
        .map_err(|e| ExportError::Encoding(format!("Failed to encode JPEG: {}", e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Framebuffer;

    #[tokio::test]
    async fn test_capture_applies_scale() {
        let fb = Framebuffer::with_color(50, 80, [255, 255, 255]).with_id("resume-preview");
        let snapshot = Capturer::scaling().capture(&fb, 2.0).await.unwrap();

        assert_eq!(snapshot.pixel_width, 100);
        assert_eq!(snapshot.pixel_height, 160);
        assert_eq!(snapshot.source, "resume-preview");
        // JPEG SOI marker
        assert_eq!(&snapshot.image_data[0..2], &[0xFF, 0xD8]);
    }

    #[tokio::test]
    async fn test_capture_detached_surface() {
        let mut fb = Framebuffer::new(10, 10).with_id("gone");
        fb.detach();

        let err = Capturer::scaling().capture(&fb, 2.0).await.unwrap_err();
        assert!(matches!(err, ExportError::SurfaceNotFound(id) if id == "gone"));
    }

    #[tokio::test]
    async fn test_capture_zero_area_surface() {
        let fb = Framebuffer::new(0, 10);
        let err = Capturer::scaling().capture(&fb, 2.0).await.unwrap_err();
        assert!(matches!(err, ExportError::Rasterization(_)));
    }

    #[tokio::test]
    async fn test_capture_rejects_bad_scale() {
        let fb = Framebuffer::new(10, 10);
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = Capturer::scaling().capture(&fb, scale).await.unwrap_err();
            assert!(matches!(err, ExportError::InvalidRequest(_)), "scale {}", scale);
        }
    }

    #[tokio::test]
    async fn test_capture_rejects_oversized_output() {
        let tiny = Framebuffer::new(1, 1);
        let err = Capturer::scaling().capture(&tiny, 1e10).await.unwrap_err();
        assert!(matches!(err, ExportError::Rasterization(_)));

        let a4 = Framebuffer::new(595, 842);
        let err = Capturer::scaling().capture(&a4, 100.0).await.unwrap_err();
        assert!(matches!(err, ExportError::Rasterization(_)));
    }

    #[test]
    fn test_output_size_limits() {
        let layout = SurfaceLayout::new(595, 842);
        assert_eq!(output_size("a4", layout, 2.0).unwrap(), (1190, 1684));

        // Within the per-side limit but over the pixel budget
        let wide = SurfaceLayout::new(60_000, 2_000);
        assert!(output_size("wide", wide, 1.0).is_err());

        let tall = SurfaceLayout::new(1, MAX_OUTPUT_SIDE + 1);
        assert!(output_size("tall", tall, 1.0).is_err());
    }

    #[tokio::test]
    async fn test_capture_does_not_mutate_surface() {
        let mut fb = Framebuffer::with_color(16, 16, [12, 34, 56]);
        fb.draw_text(0, 0, "ok", [255, 255, 255], [12, 34, 56]);
        let before = fb.as_bytes().to_vec();

        Capturer::scaling().capture(&fb, 3.0).await.unwrap();
        assert_eq!(fb.as_bytes(), before.as_slice());
    }

    #[test]
    fn test_encode_jpeg_decodes_back() {
        let img = RgbImage::from_pixel(8, 6, image::Rgb([40, 80, 120]));
        let bytes = encode_jpeg(&img, MAX_JPEG_QUALITY).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }
}
