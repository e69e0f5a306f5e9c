// Types produced and consumed by the snapshot capturer

use chrono::{DateTime, Utc};

/// Maximum JPEG quality, meaning no loss beyond the encoding itself
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Options passed to the rasterization backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterOptions {
    /// Include content loaded from other origins instead of refusing it
    pub include_cross_origin: bool,

    /// JPEG quality used when encoding the snapshot (1-100)
    pub jpeg_quality: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            include_cross_origin: true,
            jpeg_quality: MAX_JPEG_QUALITY,
        }
    }
}

/// A rasterized bitmap of a surface at a point in time
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Width of the bitmap in pixels
    pub pixel_width: u32,

    /// Height of the bitmap in pixels
    pub pixel_height: u32,

    /// JPEG-encoded pixels
    pub image_data: Vec<u8>,

    /// Id of the captured surface
    pub source: String,

    /// When the capture was taken
    pub captured_at: DateTime<Utc>,
}

impl Snapshot {
    /// Create a snapshot stamped with the current time
    pub fn new(pixel_width: u32, pixel_height: u32, image_data: Vec<u8>, source: impl Into<String>) -> Self {
        Self {
            pixel_width,
            pixel_height,
            image_data,
            source: source.into(),
            captured_at: Utc::now(),
        }
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.pixel_width) / f64::from(self.pixel_height)
    }
}
