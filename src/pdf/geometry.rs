//! Page geometry and image placement.
//!
//! All lengths are PDF points (72 pt per inch).

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};

/// PDF points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// A4 width in points
pub const A4_WIDTH_PTS: f64 = 595.0;

/// A4 height in points
pub const A4_HEIGHT_PTS: f64 = 842.0;

/// Supported page formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    #[default]
    A4,
}

impl PageFormat {
    /// Portrait (width, height) in points
    pub fn portrait_size(&self) -> (f64, f64) {
        match self {
            PageFormat::A4 => (A4_WIDTH_PTS, A4_HEIGHT_PTS),
        }
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Fixed page size in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_pts: f64,
    pub height_pts: f64,
}

impl PageGeometry {
    /// Geometry for a format in the given orientation
    pub fn new(format: PageFormat, orientation: Orientation) -> Self {
        let (short, long) = format.portrait_size();
        match orientation {
            Orientation::Portrait => Self { width_pts: short, height_pts: long },
            Orientation::Landscape => Self { width_pts: long, height_pts: short },
        }
    }

    /// A4 in portrait orientation
    pub fn a4_portrait() -> Self {
        Self::new(PageFormat::A4, Orientation::Portrait)
    }

    /// Largest ratio that fits a `pixel_width` x `pixel_height` image on the page
    pub fn fit_ratio(&self, pixel_width: u32, pixel_height: u32) -> ExportResult<f64> {
        if pixel_width == 0 || pixel_height == 0 {
            return Err(ExportError::Encoding(format!(
                "cannot place an image with zero dimensions ({}x{})",
                pixel_width, pixel_height
            )));
        }
        Ok((self.width_pts / f64::from(pixel_width)).min(self.height_pts / f64::from(pixel_height)))
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4_portrait()
    }
}

/// Position and size of an image on a page, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedImage {
    pub x: f64,
    pub y: f64,
    pub rendered_width: f64,
    pub rendered_height: f64,
}

impl PlacedImage {
    /// Scale an image to fit the page, centered horizontally and anchored to the top
    ///
    /// Overflow is never paginated: a mismatched aspect ratio leaves margins.
    pub fn fit(geometry: &PageGeometry, pixel_width: u32, pixel_height: u32) -> ExportResult<Self> {
        let ratio = geometry.fit_ratio(pixel_width, pixel_height)?;
        let rendered_width = f64::from(pixel_width) * ratio;
        let rendered_height = f64::from(pixel_height) * ratio;
        Ok(Self {
            x: (geometry.width_pts - rendered_width) / 2.0,
            y: 0.0,
            rendered_width,
            rendered_height,
        })
    }

    /// Y of the image's bottom edge in PDF coordinates (bottom-left origin)
    pub fn pdf_bottom(&self, geometry: &PageGeometry) -> f64 {
        geometry.height_pts - self.y - self.rendered_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_a4_orientations() {
        let portrait = PageGeometry::a4_portrait();
        assert_eq!((portrait.width_pts, portrait.height_pts), (595.0, 842.0));

        let landscape = PageGeometry::new(PageFormat::A4, Orientation::Landscape);
        assert_eq!((landscape.width_pts, landscape.height_pts), (842.0, 595.0));
    }

    #[test]
    fn test_square_is_width_bound() {
        let geometry = PageGeometry::a4_portrait();
        assert!((geometry.fit_ratio(1000, 1000).unwrap() - 0.595).abs() < EPS);

        let placed = PlacedImage::fit(&geometry, 1000, 1000).unwrap();
        assert!((placed.rendered_width - 595.0).abs() < EPS);
        assert!((placed.rendered_height - 595.0).abs() < EPS);
        assert!(placed.x.abs() < EPS);
        assert_eq!(placed.y, 0.0);
    }

    #[test]
    fn test_a4_like_snapshot_fills_page() {
        let geometry = PageGeometry::a4_portrait();
        let ratio = geometry.fit_ratio(1600, 2263).unwrap();
        assert!((ratio - 0.372).abs() < 0.001);

        let placed = PlacedImage::fit(&geometry, 1600, 2263).unwrap();
        assert!((placed.rendered_width - 595.0).abs() < 0.5);
        assert!((placed.rendered_height - 842.0).abs() < 0.5);
        assert!(placed.x.abs() < 0.5);
    }

    #[test]
    fn test_wide_image_is_top_anchored_with_bottom_margin() {
        let geometry = PageGeometry::a4_portrait();
        let placed = PlacedImage::fit(&geometry, 2000, 500).unwrap();

        assert_eq!(placed.y, 0.0);
        assert!((placed.rendered_width - 595.0).abs() < EPS);
        assert!(placed.rendered_height < 842.0);
        assert!((placed.pdf_bottom(&geometry) - (842.0 - placed.rendered_height)).abs() < EPS);
    }

    #[test]
    fn test_tall_image_is_centered_horizontally() {
        let geometry = PageGeometry::a4_portrait();
        let placed = PlacedImage::fit(&geometry, 100, 1000).unwrap();

        assert!((placed.rendered_height - 842.0).abs() < EPS);
        let right_margin = geometry.width_pts - placed.x - placed.rendered_width;
        assert!((placed.x - right_margin).abs() < EPS);
    }

    #[test]
    fn test_placement_stays_on_page_and_is_tight() {
        let geometries = [
            PageGeometry::a4_portrait(),
            PageGeometry::new(PageFormat::A4, Orientation::Landscape),
        ];
        let dims = [1, 3, 7, 595, 842, 1000, 1600, 2263, 4096, 65_000];

        for geometry in &geometries {
            for &w in &dims {
                for &h in &dims {
                    let placed = PlacedImage::fit(geometry, w, h).unwrap();
                    assert!(placed.rendered_width <= geometry.width_pts + EPS, "{}x{}", w, h);
                    assert!(placed.rendered_height <= geometry.height_pts + EPS, "{}x{}", w, h);
                    let width_tight = (placed.rendered_width - geometry.width_pts).abs() < 1e-6;
                    let height_tight = (placed.rendered_height - geometry.height_pts).abs() < 1e-6;
                    assert!(width_tight || height_tight, "{}x{} leaves room to grow", w, h);
                }
            }
        }
    }

    #[test]
    fn test_zero_dimension_is_encoding_error() {
        let geometry = PageGeometry::a4_portrait();
        assert!(matches!(
            PlacedImage::fit(&geometry, 0, 100),
            Err(ExportError::Encoding(_))
        ));
        assert!(matches!(
            geometry.fit_ratio(100, 0),
            Err(ExportError::Encoding(_))
        ));
    }
}
