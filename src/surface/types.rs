// Core types for renderable surfaces

use image::RgbImage;
use thiserror::Error;

/// Laid-out size of a surface in logical (1x) pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLayout {
    /// Width in logical pixels
    pub width: u32,

    /// Height in logical pixels
    pub height: u32,
}

impl SurfaceLayout {
    /// Create a layout with the given logical size
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Output pixel dimensions at the given scale factor
    ///
    /// Non-zero dimensions never round down to zero. Returns `None` when a
    /// dimension does not fit in a `u32`.
    pub fn scaled(&self, scale: f64) -> Option<(u32, u32)> {
        Some((scale_dimension(self.width, scale)?, scale_dimension(self.height, scale)?))
    }
}

fn scale_dimension(value: u32, scale: f64) -> Option<u32> {
    if value == 0 {
        return Some(0);
    }
    let scaled = (f64::from(value) * scale).round().max(1.0);
    if scaled.is_finite() && scaled <= f64::from(u32::MAX) {
        Some(scaled as u32)
    } else {
        None
    }
}

/// Pixels a surface produced for its current visual state
#[derive(Debug, Clone)]
pub struct Paint {
    /// RGB pixels at 1x
    pub pixels: RgbImage,

    /// Whether the pixels include content loaded from another origin
    pub has_foreign_content: bool,
}

/// A renderable visual region that can be captured for export
///
/// Painting must be read-only: capturing never changes what the surface shows.
pub trait Surface: Send + Sync {
    /// Identifier used in logs and by [`super::SurfaceRegistry`]
    fn id(&self) -> &str;

    /// Current laid-out size, or `None` when the surface is not mounted
    fn layout(&self) -> Option<SurfaceLayout>;

    /// Paint the current visual state at 1x
    fn paint(&self) -> SurfaceResult<Paint>;
}

/// Result type for surface operations
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Error types for surface operations
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The surface is not mounted
    #[error("Surface '{0}' is detached")]
    Detached(String),

    /// Painting failed
    #[error("Paint error: {0}")]
    Paint(String),

    /// Image decoding or encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
