pub mod geometry;
pub mod packager;

pub use geometry::{
    A4_HEIGHT_PTS, A4_WIDTH_PTS, Orientation, POINTS_PER_INCH, PageFormat, PageGeometry, PlacedImage,
};
pub use packager::{PdfDocument, package};
